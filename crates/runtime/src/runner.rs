//! The battle loop.
//!
//! [`BattleRunner`] resolves an encounter id against the content store,
//! builds the engine, and drives it: scheduler ticks run back-to-back with
//! cooperative yields, player prompts await the decision provider, and a
//! quit signal aborts between actions. Actions are atomic inside the
//! engine, so an abort never leaves the character store half-written.

use std::sync::Arc;

use tokio::sync::watch;

use battle_content::{CharacterStore, ContentStore};
use battle_core::{
    BattleConfig, BattleEngine, BattleEnv, BattleSignal, PcgRng, PlayerCommand, TeamId, mix_seed,
};

use crate::providers::{AutoPilot, PlayerDecisionProvider};

/// Builder for [`BattleRunner`].
pub struct BattleRunnerBuilder {
    content: ContentStore,
    characters: CharacterStore,
    provider: Arc<dyn PlayerDecisionProvider>,
    config: BattleConfig,
    seed: u64,
    quit: Option<watch::Receiver<bool>>,
}

impl BattleRunnerBuilder {
    pub fn new(content: ContentStore, characters: CharacterStore) -> Self {
        Self {
            content,
            characters,
            provider: Arc::new(AutoPilot),
            config: BattleConfig::default(),
            seed: 0,
            quit: None,
        }
    }

    pub fn provider(mut self, provider: Arc<dyn PlayerDecisionProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Campaign seed; each battle derives its own stream from it.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// External quit signal; flipping it to `true` aborts a running battle
    /// at the next action boundary.
    pub fn quit_signal(mut self, quit: watch::Receiver<bool>) -> Self {
        self.quit = Some(quit);
        self
    }

    pub fn build(self) -> BattleRunner {
        let quit = self.quit.unwrap_or_else(|| {
            let (_tx, rx) = watch::channel(false);
            // Sender dropped: the signal stays false forever.
            rx
        });
        BattleRunner {
            content: self.content,
            characters: self.characters,
            provider: self.provider,
            config: self.config,
            seed: self.seed,
            quit,
        }
    }
}

/// Drives battles to completion against the loaded content.
pub struct BattleRunner {
    content: ContentStore,
    characters: CharacterStore,
    provider: Arc<dyn PlayerDecisionProvider>,
    config: BattleConfig,
    seed: u64,
    quit: watch::Receiver<bool>,
}

impl BattleRunner {
    pub fn builder(content: ContentStore, characters: CharacterStore) -> BattleRunnerBuilder {
        BattleRunnerBuilder::new(content, characters)
    }

    /// The character store, for inspecting battle outcomes.
    pub fn characters(&self) -> &CharacterStore {
        &self.characters
    }

    /// Runs the battle for `encounter_id` to completion.
    ///
    /// Returns whether the player's team has at least one survivor. An
    /// unknown encounter logs and returns `false` without touching any
    /// state; an external quit aborts at the next action boundary and
    /// reports the survival state at that moment.
    pub async fn start_battle(&mut self, encounter_id: usize) -> bool {
        let Some(definition) = self.content.encounter(encounter_id).cloned() else {
            tracing::warn!(encounter_id, "unknown encounter, battle not started");
            return false;
        };
        let payload = self.content.field_payload(definition.map);

        tracing::info!(
            encounter_id,
            name = %definition.name,
            allies = definition.allies.len(),
            enemies = definition.enemies.len(),
            "battle started"
        );

        let provider = Arc::clone(&self.provider);
        let quit = self.quit.clone();
        let mut rng = PcgRng::seeded(mix_seed(self.seed, encounter_id as u64));
        let mut env = BattleEnv::new(
            &mut self.characters,
            &self.content,
            &self.content,
            &mut rng,
        );
        let mut engine = BattleEngine::new(
            &definition,
            payload.as_deref(),
            &mut env,
            self.config.clone(),
        );

        let player_won = loop {
            if *quit.borrow() {
                let survived = engine.roster().team_alive(TeamId::PLAYER);
                tracing::info!(survived, "battle aborted by quit signal");
                break survived;
            }

            match engine.tick(&mut env) {
                BattleSignal::Progressed => {
                    tokio::task::yield_now().await;
                }
                BattleSignal::PlayerPrompt { actor } => {
                    let command = match provider.decide(actor, &engine).await {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::warn!(actor, error = %e, "decision provider failed, waiting");
                            PlayerCommand::Wait
                        }
                    };
                    match engine.resume(command, &mut env) {
                        Ok(signal) => {
                            tracing::debug!(actor, ?signal, "player command resolved");
                        }
                        Err(e) => {
                            tracing::warn!(actor, error = %e, "command rejected, waiting instead");
                            // Wait is always legal; keeps a misbehaving
                            // provider from wedging the battle.
                            let _ = engine.resume(PlayerCommand::Wait, &mut env);
                        }
                    }
                }
                BattleSignal::AiActed { actor, action } => {
                    tracing::debug!(actor, ?action, "ai turn");
                }
                BattleSignal::PlayerActed { actor } => {
                    tracing::debug!(actor, "player turn complete");
                }
                BattleSignal::Ended { player_won } => break player_won,
            }
        };

        tracing::info!(encounter_id, player_won, "battle finished");
        player_won
    }
}
