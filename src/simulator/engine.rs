//! Life state machine
//!
//! A [`LifeEngine`] owns one run at a time. [`LifeEngine::restart`] starts a
//! life at age 0, [`LifeEngine::next`] advances it one year until it ends, and
//! [`LifeEngine::talent_extend`] acknowledges the finished run into the
//! [`Legacy`]. All randomness comes from the engine's own seedable generator.

use super::record::{LifeRecord, YearContent};
use crate::allocation::Allocator;
use crate::config::{EngineConfig, GameData, TalentConfig};
use crate::error::{LifeRestartError, Result};
use crate::event::{apply_event, check_eligible, process_event, roll_chance};
use crate::legacy::Legacy;
use crate::property::{AttributeSet, PropertyState};
use crate::summary::{summarize, Summary};
use crate::talent::process_talents;
use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use std::sync::Arc;

/// Where the engine is in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    NotStarted,
    InProgress,
    Ended,
}

/// State of the current run
#[derive(Debug, Clone)]
struct RunState {
    state: PropertyState,
    history: Vec<LifeRecord>,
    trigger_counts: AHashMap<i32, i32>,
    ended: bool,
    acknowledged: bool,
}

impl RunState {
    fn last(&self) -> Result<&LifeRecord> {
        self.history.last().ok_or(LifeRestartError::NoActiveRun)
    }

    fn is_fatal(&self) -> bool {
        self.state.is_fatal()
    }

    /// Fire the talents that hold right now, stopping once the life ends
    fn trigger_talents(
        &mut self,
        data: &GameData,
        rng: &mut StdRng,
        content: &mut Vec<YearContent>,
    ) {
        let fired = process_talents(
            &mut self.state,
            &data.talents,
            &data.conditions,
            &mut self.trigger_counts,
            rng,
            PropertyState::is_fatal,
        );
        content.extend(fired.into_iter().map(YearContent::from));
        if self.is_fatal() {
            self.ended = true;
        }
    }

    /// Evaluate the events of the current age in declaration order
    fn trigger_events(
        &mut self,
        data: &GameData,
        config: &EngineConfig,
        rng: &mut StdRng,
        content: &mut Vec<YearContent>,
    ) {
        let age = self.state.age;
        let mut fired_groups: SmallVec<[&str; 4]> = SmallVec::new();

        for event in data.events.events_for_age(age) {
            if check_eligible(event, &self.state, &fired_groups, &data.conditions).is_err() {
                continue;
            }
            if !roll_chance(event, rng) {
                continue;
            }

            let mut current = event;
            let mut depth = 0;
            loop {
                if let Some(ref group) = current.group {
                    fired_groups.push(group.as_str());
                }

                let result = process_event(current, &self.state, &data.conditions);
                apply_event(&mut self.state, &result, rng);
                let next_id = result.next_event_id;
                if result.ends_life || self.is_fatal() {
                    self.ended = true;
                }
                content.push(result.into());

                if self.ended {
                    return;
                }

                match next_id.and_then(|id| data.events.get(id)) {
                    Some(next) if depth < config.max_branch_depth => {
                        current = next;
                        depth += 1;
                    }
                    Some(next) => {
                        tracing::warn!(
                            "Branch chain from event {} cut at depth {} before event {}",
                            event.id,
                            depth,
                            next.id
                        );
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    fn snapshot(&self, content: Vec<YearContent>) -> LifeRecord {
        LifeRecord {
            age: self.state.age,
            attributes: self.state.attributes,
            content,
            is_end: self.ended,
        }
    }
}

/// Year-by-year life simulation over a shared data set
#[derive(Debug)]
pub struct LifeEngine {
    data: Arc<GameData>,
    config: EngineConfig,
    allocator: Allocator,
    rng: StdRng,
    legacy: Legacy,
    run: Option<RunState>,
}

impl LifeEngine {
    /// Engine seeded from OS entropy
    pub fn new(data: Arc<GameData>, config: EngineConfig) -> Self {
        Self::with_rng(data, config, StdRng::from_entropy())
    }

    /// Engine with a fixed seed; the same seed and inputs replay a run exactly
    pub fn with_seed(data: Arc<GameData>, config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(data, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(data: Arc<GameData>, config: EngineConfig, rng: StdRng) -> Self {
        Self {
            allocator: Allocator::new(&config),
            data,
            config,
            rng,
            legacy: Legacy::default(),
            run: None,
        }
    }

    /// Engine on the bundled data set with the default configuration
    pub fn builtin(seed: Option<u64>) -> Result<Self> {
        let data = GameData::builtin()?;
        Ok(match seed {
            Some(seed) => Self::with_seed(data, EngineConfig::default(), seed),
            None => Self::new(data, EngineConfig::default()),
        })
    }

    /// Continue from a previously saved legacy
    pub fn with_legacy(mut self, legacy: Legacy) -> Self {
        self.set_legacy(legacy);
        self
    }

    pub fn set_legacy(&mut self, legacy: Legacy) {
        self.legacy = legacy;
    }

    pub fn data(&self) -> &Arc<GameData> {
        &self.data
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn legacy(&self) -> &Legacy {
        &self.legacy
    }

    pub fn state(&self) -> LifeState {
        match &self.run {
            None => LifeState::NotStarted,
            Some(run) if run.ended => LifeState::Ended,
            Some(_) => LifeState::InProgress,
        }
    }

    /// Draw talents to choose from. The extended talent, when drawable, comes
    /// first; locked talents need to be unlocked by the legacy.
    pub fn draw(&mut self, count: usize) -> Vec<TalentConfig> {
        let config = &self.config;
        self.data
            .talents
            .draw(
                count,
                &self.legacy.unlocked,
                self.legacy.extended,
                |grade| config.grade_weight(grade),
                &mut self.rng,
            )
            .into_iter()
            .cloned()
            .collect()
    }

    /// Talents a draw may offer, in catalog order: unlocked talents plus the
    /// locked ones this legacy has earned
    pub fn drawable(&self) -> impl Iterator<Item = &TalentConfig> + '_ {
        self.data.talents.unlocked_for_draw(&self.legacy.unlocked)
    }

    /// Points available for the given talents
    pub fn budget(&self, talent_ids: &[i32]) -> i32 {
        self.allocator.budget(&self.data.talents, talent_ids)
    }

    /// Random distribution of the given talents' budget
    pub fn random_allocate(&mut self, talent_ids: &[i32]) -> AttributeSet {
        let budget = self.budget(talent_ids);
        self.allocator.random_allocate(budget, &mut self.rng)
    }

    /// Start a new life, discarding the previous run. Returns the birth record.
    pub fn restart(&mut self, attributes: AttributeSet, talent_ids: &[i32]) -> Result<LifeRecord> {
        let catalog = &self.data.talents;
        for (i, &id) in talent_ids.iter().enumerate() {
            if !catalog.contains(id) {
                return Err(LifeRestartError::TalentNotFound(id));
            }
            if let Some(selected) = catalog.exclusive(&talent_ids[..i], id) {
                return Err(LifeRestartError::TalentConflict {
                    selected,
                    candidate: id,
                });
            }
        }

        let budget = self.budget(talent_ids);
        let mut attributes = self.allocator.normalize(attributes, budget)?;
        attributes.spr = self.config.initial_spr;

        let mut run = RunState {
            state: PropertyState::new(attributes, talent_ids),
            history: Vec::with_capacity(self.config.max_age.max(0) as usize + 1),
            trigger_counts: AHashMap::new(),
            ended: false,
            acknowledged: false,
        };

        // Birth talents: effects and narrative only, the life cannot end at 0
        let content = process_talents(
            &mut run.state,
            &self.data.talents,
            &self.data.conditions,
            &mut run.trigger_counts,
            &mut self.rng,
            |_| false,
        )
        .into_iter()
        .map(YearContent::from)
        .collect();

        let birth = run.snapshot(content);
        run.history.push(birth.clone());
        tracing::debug!(
            "Life restarted: talents {:?}, attributes {:?}, budget {}",
            run.state.tlt,
            attributes,
            budget
        );

        self.run = Some(run);
        Ok(birth)
    }

    /// Advance one year. An ended run returns its terminal record unchanged.
    pub fn next(&mut self) -> Result<LifeRecord> {
        let data = Arc::clone(&self.data);
        let run = self.run.as_mut().ok_or(LifeRestartError::NoActiveRun)?;
        if run.ended {
            return run.last().cloned();
        }

        run.state.age += 1;
        let mut content = Vec::new();

        // A life entering the year with no STR left ends before anything fires
        if run.is_fatal() {
            run.ended = true;
        } else {
            run.trigger_talents(&data, &mut self.rng, &mut content);
        }
        if !run.ended {
            run.trigger_events(&data, &self.config, &mut self.rng, &mut content);
        }
        if !run.ended && (run.is_fatal() || run.state.age >= self.config.max_age) {
            run.ended = true;
        }

        let record = run.snapshot(content);
        run.history.push(record.clone());
        if record.is_end {
            tracing::debug!(
                "Life ended at age {} with {} events",
                record.age,
                run.state.evt.len()
            );
        }
        Ok(record)
    }

    /// Attributes of the latest record
    pub fn get_last_record(&self) -> Result<AttributeSet> {
        let run = self.run.as_ref().ok_or(LifeRestartError::NoActiveRun)?;
        Ok(run.last()?.attributes)
    }

    /// Full history of the current run, birth first
    pub fn get_record(&self) -> Result<&[LifeRecord]> {
        let run = self.run.as_ref().ok_or(LifeRestartError::NoActiveRun)?;
        Ok(&run.history)
    }

    /// Talents of the current run, in selection order
    pub fn talents(&self) -> Result<&[i32]> {
        let run = self.run.as_ref().ok_or(LifeRestartError::NoActiveRun)?;
        Ok(&run.state.tlt)
    }

    /// Acknowledge the finished run into the legacy, carrying `talent` into the
    /// next draw. Only the first call per run has an effect; later calls return
    /// `Ok(false)`.
    pub fn talent_extend(&mut self, talent: Option<i32>) -> Result<bool> {
        let run = self.run.as_mut().ok_or(LifeRestartError::NoActiveRun)?;
        if !run.ended {
            return Err(LifeRestartError::RunInProgress);
        }
        if run.acknowledged {
            return Ok(false);
        }
        if let Some(id) = talent {
            if !run.state.has_talent(id) {
                return Err(LifeRestartError::TalentNotSelected(id));
            }
        }

        run.acknowledged = true;
        self.legacy.extend(talent);
        tracing::debug!(
            "Run acknowledged: times = {}, extended = {:?}",
            self.legacy.times,
            self.legacy.extended
        );
        Ok(true)
    }

    /// Restart and run to the end, returning the whole history
    pub fn simulate(&mut self, attributes: AttributeSet, talent_ids: &[i32]) -> Result<Vec<LifeRecord>> {
        self.restart(attributes, talent_ids)?;
        while !self.next()?.is_end {}
        Ok(self.get_record()?.to_vec())
    }

    /// Summary of the current history
    pub fn summary(&self) -> Result<Summary> {
        summarize(self.get_record()?, &self.data.judge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::ContentKind;
    use crate::summary::SummaryKind;

    const TALENTS: &str = r#"[
        {"id": 1, "name": "Lucky", "description": "born lucky", "effect": {"MNY": 100}},
        {"id": 2, "name": "Frail", "description": "weak from birth", "exclude": [3]},
        {"id": 3, "name": "Tough", "description": "rarely sick", "budget_bonus": 200},
        {"id": 4, "name": "Late bloomer", "description": "grows at 10", "condition": "AGE>=10",
         "effect": {"INT": 500}}
    ]"#;

    const EVENTS: &str = r#"[
        {"id": 100, "description": "You were born.", "age": 0},
        {"id": 101, "description": "You learned to walk.", "age": 1, "effect": {"STR": 10},
         "branch": [{"condition": "MNY>1000", "event_id": 102}]},
        {"id": 102, "description": "Your nanny cheered.", "no_random": true, "effect": {"SPR": 1}},
        {"id": 103, "description": "Kindergarten A.", "age": 4, "group": "school"},
        {"id": 104, "description": "Kindergarten B.", "age": 4, "group": "school"},
        {"id": 105, "description": "A birthday.", "min_age": 1, "max_age": 200, "repeatable": true},
        {"id": 106, "description": "A quiet year.", "min_age": 2},
        {"id": 107, "description": "You passed away.", "age": 30, "ends_life": true},
        {"id": 108, "description": "A bad fall.", "age": 20, "include": "TLT?[2]", "effect": {"STR": -100000}}
    ]"#;

    const JUDGE: &str = r#"{
        "CHR": [{"min": 0, "grade": 0, "text": "c"}],
        "INT": [{"min": 0, "grade": 0, "text": "i"}],
        "STR": [{"min": 0, "grade": 0, "text": "s"}, {"min": 1, "grade": 1, "text": "S"}],
        "MNY": [{"min": 0, "grade": 0, "text": "m"}],
        "SPR": [{"min": 0, "grade": 0, "text": "p"}],
        "AGE": [{"min": 0, "grade": 0, "text": "a"}, {"min": 10, "grade": 1, "text": "A"}],
        "SUM": [{"min": 0, "grade": 0, "text": "t"}]
    }"#;

    fn engine(seed: u64) -> LifeEngine {
        let data = Arc::new(GameData::from_json(TALENTS, EVENTS, JUDGE).unwrap());
        LifeEngine::with_seed(data, EngineConfig::default(), seed)
    }

    fn attrs() -> AttributeSet {
        AttributeSet::new(2500, 2500, 2500, 2500, 0)
    }

    fn event_ids(record: &LifeRecord) -> Vec<i32> {
        record.content.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_not_started() {
        let mut engine = engine(1);
        assert_eq!(engine.state(), LifeState::NotStarted);
        assert!(matches!(engine.next(), Err(LifeRestartError::NoActiveRun)));
        assert!(matches!(engine.get_last_record(), Err(LifeRestartError::NoActiveRun)));
        assert!(matches!(engine.get_record(), Err(LifeRestartError::NoActiveRun)));
        assert!(matches!(engine.talent_extend(None), Err(LifeRestartError::NoActiveRun)));
        assert!(matches!(engine.summary(), Err(LifeRestartError::NoActiveRun)));
    }

    #[test]
    fn test_restart_birth_record() {
        let mut engine = engine(1);
        let birth = engine.restart(attrs(), &[]).unwrap();
        assert_eq!(birth.age, 0);
        assert!(!birth.is_end);
        // Events are not evaluated at birth
        assert!(birth.content.is_empty());
        assert_eq!(
            engine.get_last_record().unwrap(),
            AttributeSet::new(2500, 2500, 2500, 2500, 5)
        );
        assert_eq!(engine.state(), LifeState::InProgress);
    }

    #[test]
    fn test_restart_fires_birth_talents() {
        let mut engine = engine(1);
        let birth = engine
            .restart(AttributeSet::new(0, 0, 100, 0, 0), &[1, 4])
            .unwrap();
        assert_eq!(event_ids(&birth), vec![1]);
        assert_eq!(birth.attributes.mny, 100);
    }

    #[test]
    fn test_restart_validation() {
        let mut engine = engine(1);
        assert!(matches!(
            engine.restart(attrs(), &[99]),
            Err(LifeRestartError::TalentNotFound(99))
        ));
        assert!(matches!(
            engine.restart(attrs(), &[3, 2]),
            Err(LifeRestartError::TalentConflict {
                selected: 3,
                candidate: 2
            })
        ));
        assert!(matches!(
            engine.restart(AttributeSet::new(2501, 0, 0, 0, 5), &[]),
            Err(LifeRestartError::InvalidAllocation(_))
        ));
        // Talent 3 raises the budget to 10200
        assert!(engine
            .restart(AttributeSet::new(2500, 2500, 2500, 2500, 5), &[3])
            .is_ok());
        assert!(matches!(
            engine.restart(AttributeSet::new(2500, 2500, 2500, 2501, 5), &[3]),
            Err(LifeRestartError::InvalidAllocation(_))
        ));
    }

    #[test]
    fn test_year_by_year() {
        let mut engine = engine(1);
        engine.restart(attrs(), &[]).unwrap();

        // Age 1: walk, branch to nanny (MNY 2500 > 1000), then birthday
        let year = engine.next().unwrap();
        assert_eq!(year.age, 1);
        assert_eq!(event_ids(&year), vec![101, 102, 105]);
        assert_eq!(year.attributes.str_, 2510);
        assert_eq!(year.attributes.spr, 6);
        assert!(year.content.iter().all(|c| c.kind == ContentKind::Event));

        // Age 2: non-repeatable quiet year fires once
        let year = engine.next().unwrap();
        assert_eq!(event_ids(&year), vec![105, 106]);
        let year = engine.next().unwrap();
        assert_eq!(event_ids(&year), vec![105]);

        // Age 4: only one of the school group
        let year = engine.next().unwrap();
        assert_eq!(year.age, 4);
        assert_eq!(event_ids(&year), vec![103, 105]);
    }

    #[test]
    fn test_talents_before_events() {
        let mut engine = engine(1);
        engine.restart(attrs(), &[4]).unwrap();
        for _ in 0..9 {
            engine.next().unwrap();
        }
        let year = engine.next().unwrap();
        assert_eq!(year.age, 10);
        assert_eq!(year.content[0].id, 4);
        assert_eq!(year.content[0].name.as_deref(), Some("Late bloomer"));
        assert_eq!(year.attributes.int, 3000);
    }

    #[test]
    fn test_ends_life_event() {
        let mut engine = engine(1);
        let history = engine.simulate(attrs(), &[]).unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.age, 30);
        assert!(last.is_end);
        assert_eq!(*event_ids(last).last().unwrap(), 107);
        assert_eq!(history.len(), 31);
        assert!(history[..30].iter().all(|r| !r.is_end));
        assert_eq!(engine.state(), LifeState::Ended);
    }

    #[test]
    fn test_str_depletion_ends_life() {
        let mut engine = engine(1);
        let history = engine.simulate(attrs(), &[2]).unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.age, 20);
        assert!(last.attributes.str_ <= 0);
        // Nothing after the fatal event that year
        assert_eq!(*event_ids(last).last().unwrap(), 108);
    }

    #[test]
    fn test_age_ceiling() {
        let data = Arc::new(GameData::from_json(TALENTS, "[]", JUDGE).unwrap());
        let config = EngineConfig {
            max_age: 12,
            ..EngineConfig::default()
        };
        let mut engine = LifeEngine::with_seed(data, config, 1);
        let history = engine.simulate(attrs(), &[]).unwrap();
        assert_eq!(history.len(), 13);
        assert_eq!(history.last().unwrap().age, 12);
    }

    #[test]
    fn test_next_after_end_is_noop() {
        let mut engine = engine(1);
        engine.simulate(attrs(), &[]).unwrap();
        let len = engine.get_record().unwrap().len();
        let terminal = engine.get_record().unwrap().last().cloned().unwrap();

        assert_eq!(engine.next().unwrap(), terminal);
        assert_eq!(engine.next().unwrap(), terminal);
        assert_eq!(engine.get_record().unwrap().len(), len);
    }

    #[test]
    fn test_talent_extend() {
        let mut engine = engine(1);
        engine.restart(attrs(), &[1]).unwrap();
        engine.next().unwrap();
        assert!(matches!(
            engine.talent_extend(Some(1)),
            Err(LifeRestartError::RunInProgress)
        ));

        while !engine.next().unwrap().is_end {}
        assert!(matches!(
            engine.talent_extend(Some(3)),
            Err(LifeRestartError::TalentNotSelected(3))
        ));
        assert!(engine.talent_extend(Some(1)).unwrap());
        assert!(!engine.talent_extend(Some(1)).unwrap());
        assert!(!engine.talent_extend(None).unwrap());

        let legacy = engine.legacy();
        assert_eq!(legacy.times, 1);
        assert_eq!(legacy.extended, Some(1));
        assert!(legacy.unlocked.contains(&1));

        // The carried talent opens the next draw
        let drawn = engine.draw(3);
        assert_eq!(drawn[0].id, 1);
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn test_zero_str_at_birth_ends_first_year() {
        // Event 101 at age 1 would raise STR; the life must end before it
        for talents in [&[][..], &[1][..], &[4][..]] {
            let mut engine = engine(3);
            let birth = engine
                .restart(AttributeSet::new(100, 100, 0, 100, 0), talents)
                .unwrap();
            assert!(!birth.is_end);

            let year = engine.next().unwrap();
            assert_eq!(year.age, 1);
            assert!(year.is_end);
            assert!(year.content.is_empty());
            assert_eq!(year.attributes.str_, 0);
            assert_eq!(engine.state(), LifeState::Ended);
        }
    }

    #[test]
    fn test_with_legacy() {
        let legacy = Legacy {
            times: 4,
            extended: Some(2),
            ..Legacy::default()
        };
        let mut engine = engine(9).with_legacy(legacy);
        assert_eq!(engine.legacy().times, 4);
        assert_eq!(engine.draw(2)[0].id, 2);
    }

    #[test]
    fn test_drawable_follows_legacy() {
        let mut engine = LifeEngine::builtin(Some(2)).unwrap();
        let all = engine.data().talents.len();
        let locked: Vec<i32> = engine
            .data()
            .talents
            .all()
            .iter()
            .filter(|t| t.locked)
            .map(|t| t.id)
            .collect();
        assert!(!locked.is_empty());
        assert_eq!(engine.drawable().count(), all - locked.len());

        let mut legacy = Legacy::default();
        legacy.unlocked.insert(locked[0]);
        engine.set_legacy(legacy);
        assert_eq!(engine.drawable().count(), all - locked.len() + 1);
        assert!(engine.drawable().any(|t| t.id == locked[0]));
    }

    #[test]
    fn test_summary() {
        let mut engine = engine(1);
        engine.simulate(attrs(), &[]).unwrap();
        let summary = engine.summary().unwrap();
        assert_eq!(summary.judges.len(), 7);
        assert_eq!(summary.get(SummaryKind::Age).unwrap().text, "A");
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = LifeEngine::builtin(Some(77)).unwrap();
        let mut b = LifeEngine::builtin(Some(77)).unwrap();
        let talents: Vec<i32> = a.draw(10).iter().map(|t| t.id).collect();
        let talents_b: Vec<i32> = b.draw(10).iter().map(|t| t.id).collect();
        assert_eq!(talents, talents_b);

        let attributes = a.random_allocate(&[]);
        assert_eq!(attributes, b.random_allocate(&[]));
        assert_eq!(
            a.simulate(attributes, &[]).unwrap(),
            b.simulate(attributes, &[]).unwrap()
        );
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LifeEngine>();
    }
}
