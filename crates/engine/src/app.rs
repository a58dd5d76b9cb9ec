//! Application state and composition.

use std::sync::Arc;

use crate::entities;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{CharacterRepo, ClockPort};
use crate::use_cases::{CharacterOps, SessionRegistry};

/// Main application state.
///
/// Holds the repository ports and use cases. Passed to transports.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub config: EngineConfig,
}

/// Container for repository ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for use cases.
pub struct UseCases {
    pub creation: Arc<SessionRegistry>,
    pub characters: Arc<CharacterOps>,
}

impl App {
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        config: EngineConfig,
    ) -> Self {
        let characters = Arc::new(entities::Character::new(character_repo.clone()));

        let creation = Arc::new(SessionRegistry::new(
            characters.clone(),
            clock.clone(),
            config.session_idle_timeout,
        ));
        let character_ops = Arc::new(CharacterOps::new(characters, clock));

        Self {
            repositories: Repositories {
                character: character_repo,
            },
            use_cases: UseCases {
                creation,
                characters: character_ops,
            },
            config,
        }
    }

    /// Evict idle creation sessions on a fixed period until the task is aborted.
    pub fn spawn_session_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let registry = self.use_cases.creation.clone();
        let period = self.config.session_sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle();
                if evicted > 0 {
                    tracing::info!(evicted, "Evicted idle creation sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::persistence::InMemoryCharacterRepo;
    use crate::test_support::{now, seed};
    use sagaforge_domain::ActorId;
    use std::time::Duration;

    #[tokio::test]
    async fn sweeper_evicts_sessions_past_the_timeout() {
        let config = EngineConfig {
            session_idle_timeout: Duration::from_secs(60),
            session_sweep_interval: Duration::from_millis(10),
        };
        let clock = Arc::new(ManualClock::new(now()));
        let app = App::new(Arc::new(InMemoryCharacterRepo::new()), clock.clone(), config);

        app.use_cases
            .creation
            .start(ActorId::new("actor-1"), seed("guild-1", "Brakka"))
            .await
            .unwrap();
        let sweeper = app.spawn_session_sweeper();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(app.use_cases.creation.active_sessions(), 1);

        clock.advance(chrono::Duration::minutes(2));
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(app.use_cases.creation.active_sessions(), 0);
        sweeper.abort();
    }
}
