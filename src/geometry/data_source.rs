//! The minimal typed container backing every geometry builder's output.

use rustc_hash::FxHashMap;

use crate::ids::Token;
use crate::scene_index::SceneDataSource;

/// A named bag of child data sources, as a scene index would flatten one
/// prim's locators into.
#[derive(Debug, Clone, Default)]
pub struct Container {
    children: FxHashMap<Token, SceneDataSource>,
}

impl Container {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: Token, value: SceneDataSource) -> Self {
        self.children.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: Token) -> Option<&SceneDataSource> {
        self.children.get(name)
    }

    #[must_use]
    pub fn names(&self) -> Vec<Token> {
        self.children.keys().copied().collect()
    }

    #[must_use]
    pub fn into_data_source(self) -> SceneDataSource {
        SceneDataSource::Container(self.children.into_iter().collect())
    }
}

/// Shared trait every builder function in [`super::builders`] conforms to
/// conceptually: produce a [`SceneDataSource`] from typed scene state.
pub trait DataSourceBuilder {
    type Input;

    fn build(input: &Self::Input) -> SceneDataSource;
}
