//! Request orchestration
//!
//! [`GameService`] turns one user request into one consistent state
//! transition: it opens the player's transaction, runs decay, applies the
//! action's effects, pays the reward through the progression engine, feeds
//! the resulting metric into daily tasks, achievements, quests and the live
//! event, and records an activity log entry. Any error rolls the whole
//! request back.

mod bonus;
mod clock;
mod outcome;
mod sweep;

pub use bonus::{events_for, BonusApplied, BonusEffect, BonusEvent, BonusRoller};
pub use clock::{Clock, ManualClock, SystemClock};
pub use outcome::{
    AchievementView, EventView, InventoryLine, Notification, Outcome, PetView, PurchaseOutcome,
    QuestView, ShopOffer,
};
pub use sweep::{DailyReport, Nudge, NudgeReason, SweepReport};

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use crate::catalog::{
    find_item, item_title, price_for_level, score_play, ItemCategory, MinigameResult, CATALOG,
};
use crate::config::{Config, DailyTaskSettings, GameSettings};
use crate::domain::{NotificationPrefs, StatChange, StatField, Vital};
use crate::engine::{
    apply_action, apply_decay, apply_item, apply_progress, is_lonely, refresh_behavior, Action,
    Grant, Reward,
};
use crate::error::{GameError, GameResult};
use crate::gamification::daily::task_keys_for;
use crate::gamification::events::{POINTS_PER_CARE, POINTS_PER_MINIGAME_LOSS, POINTS_PER_MINIGAME_WIN};
use crate::gamification::quests::apply_metric;
use crate::gamification::{
    find_achievement, find_quest, select_active, AchievementTrigger, DailyProgress, LiveEvent,
    Metric, QuestProgress, StreakState, ACHIEVEMENTS, QUESTS,
};
use crate::store::{LoadContext, LogEntry, PetStore, PlayerSnapshot};
use crate::time_bucket::day_key;

/// The game's entry point, generic over storage and time
pub struct GameService<S, C> {
    store: S,
    clock: C,
    game: GameSettings,
    daily_tasks: DailyTaskSettings,
    bonus: BonusRoller,
}

impl<S: PetStore, C: Clock> GameService<S, C> {
    pub fn new(store: S, clock: C, config: &Config) -> Self {
        Self {
            store,
            clock,
            game: config.game.clone(),
            daily_tasks: config.daily_tasks.clone(),
            bonus: BonusRoller::new(config.bonus_events.chance, config.bonus_events.seed),
        }
    }

    /// Replace the bonus event roller (tests pin the chance and seed)
    pub fn with_bonus_roller(mut self, bonus: BonusRoller) -> Self {
        self.bonus = bonus;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn load_context(&self, now: DateTime<Utc>) -> LoadContext {
        LoadContext {
            now,
            day: day_key(now),
            starting_coins: self.game.starting_coins,
            task_policy: self.daily_tasks.policy,
            task_count: self.daily_tasks.count,
        }
    }

    /// Run `f` inside the player's transaction. A pet created by this load
    /// gets its behavior label and a creation entry in the log.
    fn with_player<T, F>(&self, user_id: i64, now: DateTime<Utc>, f: F) -> GameResult<T>
    where
        F: FnOnce(&mut PlayerSnapshot) -> GameResult<T>,
    {
        let ctx = self.load_context(now);
        self.store.transact(user_id, &ctx, |snap| {
            if snap.created {
                refresh_behavior(&mut snap.pet);
                let name = snap.pet.name.clone();
                snap.record("pet_created", json!({ "name": name }), now);
                info!(user_id, "Created pet");
            }
            f(snap)
        })
    }

    fn current_event(&self, now: DateTime<Utc>) -> GameResult<Option<LiveEvent>> {
        let events = self.store.live_events()?;
        Ok(select_active(&events, now).cloned())
    }

    // ========================================
    // PET STATE
    // ========================================

    /// Load the pet, creating it on first access. No decay is applied.
    pub fn get_or_create_pet(&self, user_id: i64) -> GameResult<PetView> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| Ok(PetView::new(&snap.pet, now)))
    }

    /// Apply pending decay and nothing else
    pub fn tick(&self, user_id: i64) -> GameResult<PetView> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            let lonely = is_lonely(&snap.pet, now);
            let applied = apply_decay(&mut snap.pet, now, self.game.decay_cap_seconds, lonely);
            refresh_behavior(&mut snap.pet);
            if applied > 0 {
                debug!(user_id, applied, "Applied decay");
                snap.record("tick", json!({ "applied_seconds": applied }), now);
            }
            Ok(PetView::new(&snap.pet, now))
        })
    }

    // ========================================
    // CARE
    // ========================================

    pub fn perform_action(&self, user_id: i64, action_key: &str) -> GameResult<Outcome> {
        let action = Action::parse(action_key)?;
        let now = self.clock.now();
        let event = self.current_event(now)?;
        let bonus = self.bonus.roll(action);

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, event.as_ref(), self.game.decay_cap_seconds);

            let mut changes = apply_action(&mut turn.snap.pet, action);
            if action == Action::Sleep {
                if let Some(energy) = changes
                    .iter()
                    .find(|c| c.field == StatField::Vital(Vital::Energy))
                {
                    turn.notes.push(Notification::EnergyRestored { amount: energy.delta });
                }
            }

            let mut grant = action.base_reward();
            if let Some(ev) = bonus {
                let applied = ev.apply(&mut turn.snap.pet);
                changes.extend(applied.changes);
                grant = grant.merge(applied.grant);
                turn.notes.push(Notification::BonusEvent {
                    message: ev.message.to_string(),
                });
            }

            let reward = turn.grant(grant);
            turn.touch();
            turn.track(Metric::Action(action), 1);
            turn.event_points(POINTS_PER_CARE);

            debug!(user_id, action = action.as_str(), "Performed action");
            let payload = json!({
                "action": action.as_str(),
                "bonus": bonus.map(|b| b.message),
            });
            Ok(turn.finish("action", payload).into_outcome(changes, Some(reward)))
        })
    }

    pub fn perform_item_use(&self, user_id: i64, item_key: &str) -> GameResult<Outcome> {
        let now = self.clock.now();
        let event = self.current_event(now)?;

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, event.as_ref(), self.game.decay_cap_seconds);

            let used = apply_item(&mut turn.snap.pet, &mut turn.snap.inventory, item_key)?;
            turn.notes.push(Notification::ItemUsed {
                item_key: item_key.to_string(),
                title: item_title(item_key).to_string(),
            });

            let grant = used.category.use_reward().with_intelligence(used.intelligence);
            let reward = turn.grant(grant);
            turn.touch();
            turn.track(Metric::UseItem(used.category), 1);
            turn.event_points(POINTS_PER_CARE);

            debug!(user_id, item_key, "Used item");
            let payload = json!({ "item_key": item_key, "category": used.category.as_str() });
            Ok(turn.finish("use_item", payload).into_outcome(used.changes, Some(reward)))
        })
    }

    pub fn perform_minigame(&self, user_id: i64, result: &MinigameResult) -> GameResult<Outcome> {
        let play = score_play(result)?;
        let now = self.clock.now();
        let event = self.current_event(now)?;

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, event.as_ref(), self.game.decay_cap_seconds);

            let mut changes = Vec::new();
            if let Some((energy, happiness)) = play.recovery() {
                let restored = turn.snap.pet.vitals.apply(Vital::Energy, energy);
                if restored.delta > 0 {
                    turn.notes.push(Notification::EnergyRestored { amount: restored.delta });
                }
                changes.push(restored);
                changes.push(turn.snap.pet.vitals.apply(Vital::Happiness, happiness));
            }

            let reward = turn.grant(play.reward());
            turn.touch();
            turn.track(Metric::Minigame(play.category), 1);
            turn.event_points(if play.success {
                POINTS_PER_MINIGAME_WIN
            } else {
                POINTS_PER_MINIGAME_LOSS
            });

            debug!(user_id, game = play.game.key, score = play.score, "Played minigame");
            let payload = json!({
                "game_type": play.game.key,
                "category": play.category.as_str(),
                "mode": play.mode,
                "score": play.score,
                "elapsed_ms": play.elapsed_ms,
                "success": play.success,
            });
            Ok(turn.finish("minigame", payload).into_outcome(changes, Some(reward)))
        })
    }

    // ========================================
    // DAILY REWARDS
    // ========================================

    /// Claim today's login bonus and advance the streak. `None` when it was
    /// already claimed today.
    pub fn claim_login_bonus(&self, user_id: i64) -> GameResult<Option<Outcome>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, None, self.game.decay_cap_seconds);
            let Some(bonus) = turn.snap.daily.claim_login_bonus() else {
                return Ok(None);
            };

            let streak = turn.snap.streak.update(now.date_naive());
            let mut grant = bonus;
            if streak.advanced {
                grant = grant.merge(streak.bonus);
            }
            if let Some(days) = streak.milestone {
                turn.notes.push(Notification::StreakMilestone { days });
            }
            turn.raise_streak_achievements(streak.best);
            turn.notes.push(Notification::LoginBonus);

            let reward = turn.grant(grant);
            turn.touch();

            info!(user_id, streak = streak.current, "Claimed login bonus");
            let payload = json!({ "streak": streak.current, "best_streak": streak.best });
            Ok(Some(turn.finish("login_bonus", payload).into_outcome(Vec::new(), Some(reward))))
        })
    }

    /// Open the daily chest. `None` until every task of the day is complete,
    /// and again once it has been opened.
    pub fn claim_daily_chest(&self, user_id: i64) -> GameResult<Option<Outcome>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, None, self.game.decay_cap_seconds);
            let Some(grant) = turn.snap.daily.claim_chest() else {
                return Ok(None);
            };
            turn.notes.push(Notification::ChestOpened);

            let reward = turn.grant(grant);
            turn.touch();

            info!(user_id, "Opened daily chest");
            let payload = json!({ "day": turn.snap.daily.day });
            Ok(Some(turn.finish("daily_chest", payload).into_outcome(Vec::new(), Some(reward))))
        })
    }

    // ========================================
    // CLAIMS
    // ========================================

    pub fn claim_live_event(&self, user_id: i64) -> GameResult<Outcome> {
        let now = self.clock.now();
        let event = self
            .current_event(now)?
            .ok_or_else(|| GameError::not_found("event", "active"))?;

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, Some(&event), self.game.decay_cap_seconds);
            let grant = turn.snap.event_progress_mut(&event.key).claim(&event, now)?;

            let reward = turn.grant(grant);
            turn.touch();

            info!(user_id, event = %event.key, "Claimed live event");
            let payload = json!({ "event_key": event.key });
            Ok(turn.finish("claim_event", payload).into_outcome(Vec::new(), Some(reward)))
        })
    }

    pub fn claim_achievement(&self, user_id: i64, key: &str) -> GameResult<Outcome> {
        let def = find_achievement(key).ok_or_else(|| GameError::not_found("achievement", key))?;
        let now = self.clock.now();

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, None, self.game.decay_cap_seconds);
            let grant = turn.snap.achievement_mut(def.key).claim(def, now)?;

            let reward = turn.grant(grant);
            turn.touch();

            info!(user_id, achievement = def.key, "Claimed achievement");
            let payload = json!({ "key": def.key });
            Ok(turn.finish("claim_achievement", payload).into_outcome(Vec::new(), Some(reward)))
        })
    }

    pub fn claim_quest_step(&self, user_id: i64, quest_key: &str) -> GameResult<Outcome> {
        let def = find_quest(quest_key).ok_or_else(|| GameError::not_found("quest", quest_key))?;
        let now = self.clock.now();

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, None, self.game.decay_cap_seconds);
            let claim = turn.snap.quest_mut(def.key).claim_current_step(def, now)?;
            if claim.quest_completed {
                turn.notes.push(Notification::QuestCompleted {
                    quest_key: def.key.to_string(),
                });
            }

            let reward = turn.grant(claim.reward);
            turn.touch();

            info!(user_id, quest = def.key, step = claim.step_index, "Claimed quest step");
            let payload = json!({
                "quest_key": def.key,
                "step_index": claim.step_index,
                "quest_completed": claim.quest_completed,
            });
            Ok(turn.finish("claim_quest", payload).into_outcome(Vec::new(), Some(reward)))
        })
    }

    // ========================================
    // SHOP
    // ========================================

    pub fn buy_shop_item(&self, user_id: i64, item_key: &str) -> GameResult<PurchaseOutcome> {
        let item = find_item(item_key).ok_or_else(|| GameError::not_found("item", item_key))?;
        let now = self.clock.now();

        self.with_player(user_id, now, |snap| {
            let mut turn = Turn::begin(snap, now, None, self.game.decay_cap_seconds);
            let level = turn.snap.pet.level;
            let coins = turn.snap.pet.coins;

            if level < item.level_required {
                return Err(GameError::NotEligible(format!(
                    "{} requires level {}",
                    item.key, item.level_required
                )));
            }
            let price = price_for_level(item.base_price, level);
            if coins < price {
                return Err(GameError::NotEligible(format!(
                    "{} costs {price} coins, only {coins} available",
                    item.key
                )));
            }

            turn.snap.pet.coins -= price;
            turn.snap.inventory.add(item.key, 1);
            let quantity = turn.snap.inventory.quantity(item.key);
            turn.touch();
            turn.track(Metric::ShopBuy, 1);

            info!(user_id, item = item.key, price, "Bought item");
            let closed = turn.finish("buy", json!({ "item_key": item.key, "price": price }));
            Ok(PurchaseOutcome {
                pet: closed.pet,
                item_key: item.key.to_string(),
                price,
                quantity,
                daily: closed.daily,
                notifications: closed.notifications,
            })
        })
    }

    // ========================================
    // READ VIEWS
    // ========================================

    pub fn daily_state(&self, user_id: i64) -> GameResult<DailyProgress> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| Ok(snap.daily.clone()))
    }

    pub fn inventory(&self, user_id: i64) -> GameResult<Vec<InventoryLine>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            Ok(snap
                .inventory
                .iter()
                .map(|(key, quantity)| InventoryLine {
                    key: key.to_string(),
                    title: item_title(key).to_string(),
                    category: ItemCategory::of(key),
                    quantity,
                })
                .collect())
        })
    }

    /// Full catalog priced for the pet's current level
    pub fn shop_catalog(&self, user_id: i64) -> GameResult<Vec<ShopOffer>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            let level = snap.pet.level;
            let coins = snap.pet.coins;
            Ok(CATALOG
                .iter()
                .map(|item| {
                    let price = price_for_level(item.base_price, level);
                    ShopOffer {
                        key: item.key.to_string(),
                        title: item.title.to_string(),
                        section: item.section.to_string(),
                        category: ItemCategory::of(item.key),
                        price,
                        level_required: item.level_required,
                        unlocked: level >= item.level_required,
                        affordable: coins >= price,
                        owned: snap.inventory.quantity(item.key),
                    }
                })
                .collect())
        })
    }

    pub fn active_event(&self, user_id: i64) -> GameResult<Option<EventView>> {
        let now = self.clock.now();
        let Some(event) = self.current_event(now)? else {
            return Ok(None);
        };
        self.with_player(user_id, now, |snap| {
            let progress = snap.event_progress(&event.key);
            Ok(Some(EventView {
                key: event.key.clone(),
                title: event.title.clone(),
                description: event.description.clone(),
                starts_at: event.starts_at,
                ends_at: event.ends_at,
                target_points: event.target_points,
                points: progress.map_or(0, |p| p.points),
                completed: progress.is_some_and(|p| p.completed_at.is_some()),
                claimed: progress.is_some_and(|p| p.claimed_at.is_some()),
                reward: event.reward,
            }))
        })
    }

    pub fn achievements(&self, user_id: i64) -> GameResult<Vec<AchievementView>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            Ok(ACHIEVEMENTS
                .iter()
                .map(|def| {
                    let row = snap.achievements.iter().find(|a| a.key == def.key);
                    AchievementView {
                        key: def.key.to_string(),
                        title: def.title.to_string(),
                        description: def.description.to_string(),
                        target: def.target,
                        progress: row.map_or(0, |a| a.progress),
                        completed: row.is_some_and(|a| a.completed_at.is_some()),
                        claimed: row.is_some_and(|a| a.claimed_at.is_some()),
                        reward: def.reward,
                    }
                })
                .collect())
        })
    }

    pub fn quests(&self, user_id: i64) -> GameResult<Vec<QuestView>> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            Ok(QUESTS
                .iter()
                .map(|def| {
                    let progress = snap
                        .quests
                        .iter()
                        .find(|q| q.key == def.key)
                        .cloned()
                        .unwrap_or_else(|| QuestProgress::new(def.key));
                    let step = progress.current_step(def);
                    QuestView {
                        key: def.key.to_string(),
                        title: def.title.to_string(),
                        description: def.description.to_string(),
                        step_index: progress.current_step_index,
                        step_count: def.steps.len(),
                        step_title: step.map(|s| s.title.to_string()),
                        step_target: step.map(|s| s.target),
                        step_progress: progress.step_progress,
                        step_completed: progress.step_completed_at.is_some(),
                        step_reward: step.map(|s| s.reward),
                        finished: progress.is_finished(),
                    }
                })
                .collect())
        })
    }

    pub fn streak(&self, user_id: i64) -> GameResult<StreakState> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| Ok(snap.streak.clone()))
    }

    /// Most recent entries first
    pub fn history(&self, user_id: i64, limit: usize) -> GameResult<Vec<LogEntry>> {
        self.store.history(user_id, limit)
    }

    pub fn notification_prefs(&self, user_id: i64) -> GameResult<NotificationPrefs> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| Ok(snap.prefs))
    }

    pub fn set_notification_prefs(
        &self,
        user_id: i64,
        prefs: NotificationPrefs,
    ) -> GameResult<NotificationPrefs> {
        let now = self.clock.now();
        self.with_player(user_id, now, |snap| {
            snap.prefs = prefs;
            snap.record("notification_prefs", json!(prefs), now);
            Ok(snap.prefs)
        })
    }

    /// Create or replace a live event definition
    pub fn upsert_live_event(&self, event: &LiveEvent) -> GameResult<()> {
        if event.ends_at <= event.starts_at {
            return Err(GameError::InvalidInput(format!(
                "event {} ends before it starts",
                event.key
            )));
        }
        self.store.upsert_live_event(event)?;
        info!(event = %event.key, enabled = event.enabled, "Saved live event");
        Ok(())
    }
}

/// One request's work on a loaded snapshot
struct Turn<'s> {
    snap: &'s mut PlayerSnapshot,
    now: DateTime<Utc>,
    event: Option<&'s LiveEvent>,
    /// Whether the pet was lonely before this request
    lonely: bool,
    notes: Vec<Notification>,
}

/// Shared tail of every outcome
struct Closed {
    pet: PetView,
    daily: DailyProgress,
    notifications: Vec<Notification>,
}

impl Closed {
    fn into_outcome(self, changes: Vec<StatChange>, reward: Option<Reward>) -> Outcome {
        Outcome {
            pet: self.pet,
            changes,
            reward,
            daily: self.daily,
            notifications: self.notifications,
        }
    }
}

impl<'s> Turn<'s> {
    /// Loneliness is judged before decay so the decay itself can use it
    fn begin(
        snap: &'s mut PlayerSnapshot,
        now: DateTime<Utc>,
        event: Option<&'s LiveEvent>,
        cap_seconds: i64,
    ) -> Self {
        let lonely = is_lonely(&snap.pet, now);
        apply_decay(&mut snap.pet, now, cap_seconds, lonely);
        Self {
            snap,
            now,
            event,
            lonely,
            notes: Vec::new(),
        }
    }

    fn touch(&mut self) {
        self.snap.pet.last_active_at = self.now;
    }

    fn note_achievement(&mut self, key: &str) {
        self.notes.push(Notification::AchievementCompleted {
            key: key.to_string(),
        });
    }

    /// Pay a grant and report what it caused
    fn grant(&mut self, grant: Grant) -> Reward {
        let snap = &mut *self.snap;
        let reward = apply_progress(&mut snap.pet, &mut snap.inventory, grant);

        for level in &reward.levels_gained {
            self.notes.push(Notification::LevelUp { level: *level });
        }
        if reward.stage_changed {
            self.notes.push(Notification::StageChanged {
                from: reward.stage_before,
                to: reward.stage_after,
            });
        }
        for key in &reward.unlocks {
            self.notes.push(Notification::ItemUnlocked {
                item_key: key.clone(),
            });
        }

        let earned = reward.total_coins();
        if earned > 0 {
            for def in ACHIEVEMENTS {
                if def.trigger == AchievementTrigger::CoinsEarned
                    && self.snap.achievement_mut(def.key).add(def, earned, self.now)
                {
                    self.note_achievement(def.key);
                }
            }
        }
        reward
    }

    fn raise_streak_achievements(&mut self, best: u32) {
        for def in ACHIEVEMENTS {
            if def.trigger == AchievementTrigger::BestStreak
                && self.snap.achievement_mut(def.key).raise_to(def, best as u64, self.now)
            {
                self.note_achievement(def.key);
            }
        }
    }

    /// Feed a metric into daily tasks, achievements and quests
    fn track(&mut self, metric: Metric, amount: u32) {
        if amount == 0 {
            return;
        }

        let all_done_before = self.snap.daily.all_required_completed();
        for key in task_keys_for(&metric) {
            if self.snap.daily.increment_task(key, amount) {
                self.notes.push(Notification::TaskCompleted {
                    task_key: key.to_string(),
                });
            }
        }
        if !all_done_before && self.snap.daily.all_required_completed() {
            self.notes.push(Notification::AllTasksCompleted);
        }

        for def in ACHIEVEMENTS {
            let AchievementTrigger::Metric(pattern) = def.trigger else {
                continue;
            };
            if pattern.matches(&metric)
                && self.snap.achievement_mut(def.key).add(def, amount as u64, self.now)
            {
                self.note_achievement(def.key);
            }
        }

        for step in apply_metric(&mut self.snap.quests, &metric, amount, self.now) {
            self.notes.push(Notification::QuestStepCompleted {
                quest_key: step.quest_key,
                step_index: step.step_index,
                step_title: step.step_title,
            });
        }
    }

    /// Points for the active event, if there is one and it is still open
    fn event_points(&mut self, points: i64) {
        let Some(event) = self.event else {
            return;
        };
        let progress = self.snap.event_progress_mut(&event.key);
        if progress.claimed_at.is_some() || points <= 0 {
            return;
        }
        if progress.add_points(event, points, self.now) {
            self.notes.push(Notification::EventCompleted {
                event_key: event.key.clone(),
            });
        }
        self.track(Metric::EventPoints, points as u32);
    }

    /// Post-request notifications, behavior refresh and the log entry
    fn finish(mut self, action: &str, payload: serde_json::Value) -> Closed {
        if self.snap.pet.vitals.hunger < 30 {
            self.notes.push(Notification::Hungry);
        }
        if self.lonely {
            self.notes.push(Notification::Lonely);
        }
        refresh_behavior(&mut self.snap.pet);
        self.snap.record(action, payload, self.now);

        Closed {
            pet: PetView::new(&self.snap.pet, self.now),
            daily: self.snap.daily.clone(),
            notifications: self.notes,
        }
    }
}
