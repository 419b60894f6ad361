//! Composable, conditionally-applied search filtering.
//!
//! # Responsibility
//! - Hold an ordered sequence of filter steps and fold them over a base
//!   query, applying each step only when its condition holds for the
//!   caller's search parameters.
//!
//! # Invariants
//! - Steps apply strictly in declaration order and compose as a logical AND:
//!   an active step can only narrow the query, never widen it.
//! - String search fields are normalized to lower case in place before any
//!   step runs; search is case-insensitive by contract and callers must
//!   treat parameters as consumed by `apply`.
//! - When every condition is false the base query is returned unchanged.

/// Caller-supplied search parameters consumed by a pipeline.
pub trait SearchParams {
    /// Lowercases every string-valued search field in place.
    fn normalize(&mut self);
}

/// One conditionally-applied query refinement.
pub struct SearchStep<Q, P> {
    condition: Box<dyn Fn(&P) -> bool>,
    refine: Box<dyn Fn(Q, &P) -> Q>,
}

impl<Q, P> SearchStep<Q, P> {
    pub fn new(
        condition: impl Fn(&P) -> bool + 'static,
        refine: impl Fn(Q, &P) -> Q + 'static,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            refine: Box::new(refine),
        }
    }

    fn apply(&self, params: &P, query: Q) -> Q {
        if (self.condition)(params) {
            (self.refine)(query, params)
        } else {
            query
        }
    }
}

/// Ordered pipeline of [`SearchStep`]s over a query type `Q`.
///
/// The refined query is a descriptor only; execution stays with the caller
/// (typically a repository's filter-accepting read).
pub struct SearchPipeline<Q, P> {
    steps: Vec<SearchStep<Q, P>>,
}

impl<Q, P: SearchParams> SearchPipeline<Q, P> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends one step; order is fixed for the lifetime of the pipeline.
    pub fn add_step(
        &mut self,
        condition: impl Fn(&P) -> bool + 'static,
        refine: impl Fn(Q, &P) -> Q + 'static,
    ) {
        self.steps.push(SearchStep::new(condition, refine));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Normalizes `params` in place, then folds the steps over `base`.
    pub fn apply(&self, params: &mut P, base: Q) -> Q {
        params.normalize();
        self.steps
            .iter()
            .fold(base, |query, step| step.apply(params, query))
    }
}

impl<Q, P: SearchParams> Default for SearchPipeline<Q, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchParams, SearchPipeline};

    #[derive(Default)]
    struct Params {
        term: Option<String>,
        minimum: Option<i64>,
    }

    impl SearchParams for Params {
        fn normalize(&mut self) {
            if let Some(term) = self.term.as_mut() {
                *term = term.to_lowercase();
            }
        }
    }

    fn pipeline() -> SearchPipeline<Vec<&'static str>, Params> {
        let mut pipeline = SearchPipeline::new();
        pipeline.add_step(
            |params: &Params| params.term.is_some(),
            |mut query: Vec<&'static str>, _| {
                query.push("term");
                query
            },
        );
        pipeline.add_step(
            |params: &Params| params.minimum.is_some(),
            |mut query, _| {
                query.push("minimum");
                query
            },
        );
        pipeline
    }

    #[test]
    fn all_conditions_false_returns_base_unchanged() {
        let mut params = Params::default();
        let refined = pipeline().apply(&mut params, vec!["base"]);
        assert_eq!(refined, vec!["base"]);
    }

    #[test]
    fn active_steps_apply_in_declaration_order() {
        let mut params = Params {
            term: Some("X".to_string()),
            minimum: Some(3),
        };
        let refined = pipeline().apply(&mut params, vec!["base"]);
        assert_eq!(refined, vec!["base", "term", "minimum"]);
    }

    #[test]
    fn apply_lowercases_string_fields_in_place() {
        let mut params = Params {
            term: Some("MiXeD".to_string()),
            minimum: None,
        };
        let _ = pipeline().apply(&mut params, Vec::new());
        assert_eq!(params.term.as_deref(), Some("mixed"));
    }
}
