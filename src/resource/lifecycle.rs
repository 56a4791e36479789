//! Resource lifecycle
//!
//! Create and Update both re-run the full request pipeline. Read only checks
//! that an id is still recorded, Delete only forgets it; neither touches the
//! remote endpoint.

use super::fetcher::{Clock, Fetched, Fetcher};
use super::state::ResourceState;
use crate::config::{ProviderConfig, ResourceConfig};
use crate::error::ResourceError;
use crate::http::RequestExecutor;

/// What applying a configuration to prior state will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Create,
    Update,
    /// `url` or `force_new` changed: delete, then create
    Replace,
}

/// Decide how `cfg` applies on top of `prior`
pub fn plan(prior: Option<&ResourceState>, cfg: &ResourceConfig) -> Plan {
    match prior {
        Some(state) if state.is_present() => {
            if state.url != cfg.url || state.force_new != cfg.force_new {
                Plan::Replace
            } else {
                Plan::Update
            }
        }
        _ => Plan::Create,
    }
}

/// The REST resource type
#[derive(Debug, Clone)]
pub struct RestResource {
    fetcher: Fetcher,
}

impl RestResource {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            fetcher: Fetcher::new(provider),
        }
    }

    pub fn with_executor(mut self, executor: RequestExecutor) -> Self {
        self.fetcher = self.fetcher.with_executor(executor);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.fetcher = self.fetcher.with_clock(clock);
        self
    }

    pub async fn create(&self, cfg: &ResourceConfig) -> Result<ResourceState, ResourceError> {
        let Fetched {
            id,
            response,
            response_headers,
        } = self.fetcher.fetch(cfg).await?;

        let mut state = ResourceState {
            id,
            response,
            response_headers,
            url: cfg.url.clone(),
            force_new: cfg.force_new.clone(),
        };
        self.read(&mut state)?;

        tracing::info!("Resource '{}' stored for {}", state.id, cfg.url);
        Ok(state)
    }

    /// Same as [`RestResource::create`]
    pub async fn update(&self, cfg: &ResourceConfig) -> Result<ResourceState, ResourceError> {
        self.create(cfg).await
    }

    /// An empty id means the resource is gone; its state is cleared
    pub fn read(&self, state: &mut ResourceState) -> Result<(), ResourceError> {
        if state.id.is_empty() {
            *state = ResourceState::default();
            return Err(ResourceError::NotFound);
        }
        Ok(())
    }

    pub fn delete(&self, state: &mut ResourceState) {
        tracing::info!("Forgetting resource '{}'", state.id);
        state.id.clear();
    }

    /// No remote existence check is made; a recorded resource always exists
    pub fn exists(&self, _state: &ResourceState) -> bool {
        true
    }

    /// Run the plan for `cfg` against `prior`
    pub async fn apply(
        &self,
        prior: Option<ResourceState>,
        cfg: &ResourceConfig,
    ) -> Result<ResourceState, ResourceError> {
        let plan = plan(prior.as_ref(), cfg);
        tracing::debug!("Applying {:?} for {}", plan, cfg.url);

        match (plan, prior) {
            (Plan::Replace, Some(mut state)) => {
                self.delete(&mut state);
                self.create(cfg).await
            }
            (Plan::Update, _) => self.update(cfg).await,
            _ => self.create(cfg).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(url: &str) -> ResourceState {
        ResourceState {
            id: "abc".to_string(),
            response: "{}".to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_read_empty_id_is_not_found() {
        let resource = RestResource::new(ProviderConfig::default());
        let mut state = ResourceState::default();
        assert!(matches!(
            resource.read(&mut state),
            Err(ResourceError::NotFound)
        ));
        assert_eq!(state, ResourceState::default());
    }

    #[test]
    fn test_read_present_is_noop() {
        let resource = RestResource::new(ProviderConfig::default());
        let mut state = present("http://x/");
        resource.read(&mut state).unwrap();
        assert_eq!(state, present("http://x/"));
    }

    #[test]
    fn test_delete_clears_id_then_read_fails() {
        let resource = RestResource::new(ProviderConfig::default());
        let mut state = present("http://x/");
        resource.delete(&mut state);
        assert!(!state.is_present());
        assert!(resource.read(&mut state).is_err());
    }

    #[test]
    fn test_exists_is_unconditional() {
        let resource = RestResource::new(ProviderConfig::default());
        assert!(resource.exists(&present("http://x/")));
        assert!(resource.exists(&ResourceState::default()));
    }

    #[test]
    fn test_plan() {
        let cfg = ResourceConfig::new("http://x/");
        assert_eq!(plan(None, &cfg), Plan::Create);
        assert_eq!(plan(Some(&ResourceState::default()), &cfg), Plan::Create);
        assert_eq!(plan(Some(&present("http://x/")), &cfg), Plan::Update);
        assert_eq!(plan(Some(&present("http://y/")), &cfg), Plan::Replace);

        let mut forced = cfg.clone();
        forced.force_new = vec!["v2".to_string()];
        assert_eq!(plan(Some(&present("http://x/")), &forced), Plan::Replace);
    }
}
