//! Daily tasks, login bonus and daily chest
//!
//! A day's task set is drawn from [`TASK_POOL`] with a PRNG seeded by the
//! day key, so every player sees the same tasks on a given date. The fixed
//! three-task list is still available through [`TaskPolicy::Fixed`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::metrics::Metric;
use crate::catalog::MinigameCategory;
use crate::engine::{Action, Grant};
use crate::error::GameResult;
use crate::time_bucket::day_seed;

/// Login bonus: 100 coins, 12 XP
pub const LOGIN_BONUS: Grant = Grant::new(12, 100);
/// Chest for finishing every task of the day: 50 coins, 30 XP
pub const DAILY_CHEST: Grant = Grant::new(30, 50);

pub const TASKS_DOC_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub target: u32,
}

const fn task(key: &'static str, title: &'static str, target: u32) -> TaskTemplate {
    TaskTemplate { key, title, target }
}

pub static TASK_POOL: &[TaskTemplate] = &[
    task("feed_count", "Feed your pet 2 times", 2),
    task("play_count", "Play with your pet", 1),
    task("wash_count", "Give your pet a bath", 1),
    task("chat_count", "Chat with your pet 2 times", 2),
    task("sleep_count", "Put your pet to bed", 1),
    task("heal_count", "Take care of your pet's health", 1),
    task("minigame_count", "Play a minigame", 1),
    task("math_minigame_count", "Solve a math minigame", 1),
    task("letters_game_count", "Play a letters game", 1),
    task("use_item_count", "Use 2 items", 2),
    task("shop_buy_count", "Buy something in the shop", 1),
];

/// Keys of the fixed-policy task list, in display order
pub const FIXED_TASKS: [&str; 3] = ["feed_count", "minigame_count", "play_count"];

pub fn find_template(key: &str) -> Option<&'static TaskTemplate> {
    TASK_POOL.iter().find(|t| t.key == key)
}

/// How a day's task set is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPolicy {
    /// Sample from the pool, seeded by the date
    #[default]
    Seeded,
    /// Always feed / minigame / play
    Fixed,
}

/// Task keys a metric advances
pub fn task_keys_for(metric: &Metric) -> Vec<&'static str> {
    match metric {
        Metric::Action(action) => match action {
            Action::Feed => vec!["feed_count"],
            Action::Play => vec!["play_count"],
            Action::Wash => vec!["wash_count"],
            Action::Chat => vec!["chat_count"],
            Action::Sleep => vec!["sleep_count"],
            Action::Heal => vec!["heal_count"],
            Action::Clean => vec![],
        },
        Metric::UseItem(_) => vec!["use_item_count"],
        Metric::ShopBuy => vec!["shop_buy_count"],
        Metric::Minigame(category) => match category {
            MinigameCategory::Math => vec!["minigame_count", "math_minigame_count"],
            MinigameCategory::Letters => vec!["minigame_count", "letters_game_count"],
            _ => vec!["minigame_count"],
        },
        Metric::EventPoints => vec![],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    /// Bare-array documents stored this as `task_key`
    #[serde(alias = "task_key")]
    pub key: String,
    pub title: String,
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
    /// Instantiated on demand outside the day's set; never gates the chest
    #[serde(default)]
    pub extra: bool,
}

impl DailyTask {
    fn from_template(t: &TaskTemplate) -> Self {
        Self {
            key: t.key.to_string(),
            title: t.title.to_string(),
            target: t.target,
            progress: 0,
            completed: false,
            extra: false,
        }
    }
}

/// Pick the task set for a day.
pub fn select_tasks(day: &str, policy: TaskPolicy, count: usize) -> Vec<DailyTask> {
    match policy {
        TaskPolicy::Fixed => FIXED_TASKS
            .iter()
            .filter_map(|key| find_template(key))
            .map(DailyTask::from_template)
            .collect(),
        TaskPolicy::Seeded => {
            let mut rng = StdRng::seed_from_u64(day_seed(day));
            let amount = count.clamp(1, TASK_POOL.len());
            let mut picks = rand::seq::index::sample(&mut rng, TASK_POOL.len(), amount).into_vec();
            picks.sort_unstable();
            picks
                .into_iter()
                .map(|i| DailyTask::from_template(&TASK_POOL[i]))
                .collect()
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TasksDoc {
    version: u32,
    tasks: Vec<DailyTask>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTasks {
    Versioned(TasksDoc),
    /// Bare array written before the document was versioned
    Legacy(Vec<DailyTask>),
}

pub fn encode_tasks(tasks: &[DailyTask]) -> GameResult<String> {
    let doc = TasksDoc {
        version: TASKS_DOC_VERSION,
        tasks: tasks.to_vec(),
    };
    Ok(serde_json::to_string(&doc)?)
}

/// Decode a stored task document. Unreadable data is replaced by a fresh
/// task set for the day instead of failing the request.
pub fn decode_tasks(raw: &str, day: &str, policy: TaskPolicy, count: usize) -> Vec<DailyTask> {
    match serde_json::from_str::<StoredTasks>(raw) {
        Ok(StoredTasks::Versioned(doc)) if doc.version <= TASKS_DOC_VERSION => doc.tasks,
        Ok(StoredTasks::Versioned(doc)) => {
            warn!(day, version = doc.version, "Unknown daily task document version, regenerating");
            select_tasks(day, policy, count)
        }
        Ok(StoredTasks::Legacy(tasks)) => tasks,
        Err(e) => {
            warn!(day, error = %e, "Corrupt daily task document, regenerating");
            select_tasks(day, policy, count)
        }
    }
}

/// One player's progress for one UTC day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub day: String,
    pub tasks: Vec<DailyTask>,
    pub login_bonus_claimed: bool,
    pub chest_claimed: bool,
}

impl DailyProgress {
    pub fn new(day: &str, policy: TaskPolicy, count: usize) -> Self {
        Self {
            day: day.to_string(),
            tasks: select_tasks(day, policy, count),
            login_bonus_claimed: false,
            chest_claimed: false,
        }
    }

    /// Advance a task by `amount`. Returns true when this call completed it.
    ///
    /// Pool tasks outside today's set are added as extras; unknown keys are
    /// ignored.
    pub fn increment_task(&mut self, key: &str, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        let task = match self.tasks.iter_mut().position(|t| t.key == key) {
            Some(i) => &mut self.tasks[i],
            None => {
                let Some(template) = find_template(key) else {
                    return false;
                };
                let mut extra = DailyTask::from_template(template);
                extra.extra = true;
                self.tasks.push(extra);
                let last = self.tasks.len() - 1;
                &mut self.tasks[last]
            }
        };

        let was_completed = task.completed;
        task.progress = task.progress.saturating_add(amount).min(task.target);
        task.completed = task.progress >= task.target;
        task.completed && !was_completed
    }

    /// All of the day's own tasks are done
    pub fn all_required_completed(&self) -> bool {
        let mut required = self.tasks.iter().filter(|t| !t.extra).peekable();
        required.peek().is_some() && required.all(|t| t.completed)
    }

    /// Once per day; `None` when already taken.
    pub fn claim_login_bonus(&mut self) -> Option<Grant> {
        if self.login_bonus_claimed {
            return None;
        }
        self.login_bonus_claimed = true;
        Some(LOGIN_BONUS)
    }

    /// Once per day after every task is complete; `None` otherwise.
    pub fn claim_chest(&mut self) -> Option<Grant> {
        if self.chest_claimed || !self.all_required_completed() {
            return None;
        }
        self.chest_claimed = true;
        Some(DAILY_CHEST)
    }
}
