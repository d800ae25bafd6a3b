//! HMM Viterbi chord smoother
//!
//! Turns a (frames × states) cost matrix into the lowest-cost state sequence,
//! penalising state changes through a transition-cost matrix. States are the
//! 60 chord templates.
//!
//! # Model
//!
//! - Transition probability: `stay` on the diagonal, `change / (S - 1)` elsewhere,
//!   each row renormalised to sum to 1 (so raw weights are also accepted).
//! - Transition cost: `-ln(p)`.
//! - `dp[0] = cost[0]`, `dp[t][s] = cost[t][s] + min_p(dp[t-1][p] + trans[p][s])`.
//! - Ties on every argmin resolve to the lowest state index.
//!
//! The dp and backpointer tables are dense `(T, S)` arrays; each step is one
//! broadcast add over the `(S, S)` transition matrix.

use ndarray::{Array2, ArrayView1, Axis};

use super::templates::NUM_TEMPLATES;
use crate::error::AnalysisError;

/// Viterbi decoder over a fixed state space
#[derive(Debug, Clone)]
pub struct ViterbiSmoother {
    /// Self-transition probability
    pub stay_probability: f32,

    /// Total probability mass spread over the other states
    pub change_probability: f32,

    n_states: usize,
}

impl ViterbiSmoother {
    /// Create a smoother over the 60 chord templates
    pub fn new(stay_probability: f32, change_probability: f32) -> Self {
        Self::with_states(NUM_TEMPLATES, stay_probability, change_probability)
    }

    /// Create a smoother over an arbitrary number of states
    pub fn with_states(n_states: usize, stay_probability: f32, change_probability: f32) -> Self {
        Self {
            stay_probability,
            change_probability,
            n_states,
        }
    }

    /// Number of hidden states
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// Transition cost matrix `-ln(p)`, shape (S, S), rows indexed by the previous state
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for non-finite or negative
    /// probabilities, or when a row has no probability mass at all.
    pub fn transition_costs(&self) -> Result<Array2<f32>, AnalysisError> {
        let (stay, change) = (self.stay_probability, self.change_probability);
        if !stay.is_finite() || !change.is_finite() || stay < 0.0 || change < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Transition probabilities must be finite and non-negative (stay={}, change={})",
                stay, change
            )));
        }
        if self.n_states == 0 {
            return Err(AnalysisError::InvalidInput(
                "Viterbi state space is empty".to_string(),
            ));
        }

        let off_diagonal = if self.n_states > 1 {
            change / (self.n_states - 1) as f32
        } else {
            0.0
        };
        let mut probs = Array2::<f32>::from_elem((self.n_states, self.n_states), off_diagonal);
        probs.diag_mut().fill(stay);

        let row_sums = probs.sum_axis(Axis(1));
        if row_sums.iter().any(|&s| s <= 0.0) {
            return Err(AnalysisError::InvalidInput(
                "Transition rows must carry probability mass".to_string(),
            ));
        }
        probs /= &row_sums.insert_axis(Axis(1));

        Ok(probs.mapv(|p| -p.ln()))
    }

    /// Decode the lowest-cost state path
    ///
    /// # Arguments
    ///
    /// * `costs` - Cost matrix, shape (T, S), higher = worse
    ///
    /// # Returns
    ///
    /// One state index per frame (length T, every value < S)
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if T = 0, the state count does not
    /// match, or the transition probabilities are invalid.
    pub fn decode(&self, costs: &Array2<f32>) -> Result<Vec<usize>, AnalysisError> {
        let (n_frames, n_states) = costs.dim();
        if n_frames == 0 {
            return Err(AnalysisError::InvalidInput(
                "Cannot decode an empty cost matrix".to_string(),
            ));
        }
        if n_states != self.n_states {
            return Err(AnalysisError::InvalidInput(format!(
                "Cost matrix has {} states, expected {}",
                n_states, self.n_states
            )));
        }

        log::debug!(
            "Viterbi decoding {} frames over {} states (stay={}, change={})",
            n_frames,
            n_states,
            self.stay_probability,
            self.change_probability
        );

        let trans = self.transition_costs()?;
        let mut dp = Array2::<f32>::zeros((n_frames, n_states));
        let mut back = Array2::<usize>::zeros((n_frames, n_states));
        dp.row_mut(0).assign(&costs.row(0));

        for t in 1..n_frames {
            // candidates[p, s] = dp[t-1, p] + trans[p, s]
            let candidates = &trans + &dp.row(t - 1).insert_axis(Axis(1));
            for (state, column) in candidates.axis_iter(Axis(1)).enumerate() {
                let (best_prev, best_cost) = argmin(column);
                back[[t, state]] = best_prev;
                dp[[t, state]] = costs[[t, state]] + best_cost;
            }
        }

        let mut path = vec![0usize; n_frames];
        path[n_frames - 1] = argmin(dp.row(n_frames - 1)).0;
        for t in (1..n_frames).rev() {
            path[t - 1] = back[[t, path[t]]];
        }

        Ok(path)
    }
}

/// Index and value of the smallest element; the lowest index wins ties
fn argmin(values: ArrayView1<f32>) -> (usize, f32) {
    let mut best = (0usize, f32::INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v < best.1 {
            best = (i, v);
        }
    }
    if best.1 == f32::INFINITY {
        // All candidates unreachable: fall back to the first
        best = (0, values.first().copied().unwrap_or(f32::INFINITY));
    }
    best
}
