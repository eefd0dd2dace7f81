//! Benchmark for simulation performance
//!
//! Target: a full life on the bundled data should complete well under 1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use life_restart_engine::condition::{parser::parse, ConditionCache};
use life_restart_engine::config::{EventConfig, EventEffect, TalentConfig, TalentEffect};
use life_restart_engine::summary::JudgeTable;
use life_restart_engine::{AttributeSet, EngineConfig, GameData, LifeEngine};
use std::sync::Arc;

/// A larger synthetic data set: 100 talents, 500 events
fn create_test_data() -> Arc<GameData> {
    let talents = (1..=100)
        .map(|i| TalentConfig {
            id: i,
            name: format!("Talent {}", i),
            description: format!("Description for talent {}", i),
            grade: i % 4,
            max_triggers: if i % 10 == 0 { 3 } else { 1 },
            condition: if i % 5 == 0 {
                Some(format!("AGE>={}", i % 50))
            } else {
                None
            },
            effect: Some(TalentEffect {
                chr: if i % 6 == 0 { 10 } else { 0 },
                int: if i % 6 == 1 { 10 } else { 0 },
                str_: if i % 6 == 2 { 10 } else { 0 },
                mny: if i % 6 == 3 { 10 } else { 0 },
                spr: if i % 6 == 4 { 1 } else { 0 },
                rdm: if i % 6 == 5 { 10 } else { 0 },
            }),
            exclude: if i % 15 == 0 { vec![i % 100 + 1] } else { vec![] },
            budget_bonus: 0,
            locked: false,
        })
        .collect();

    let events = (1..=500)
        .map(|i| EventConfig {
            id: 1000 + i,
            description: format!("Event {} happened", i),
            grade: i % 4,
            age: None,
            min_age: Some(i % 100),
            max_age: Some(i % 100 + 20),
            condition: if i % 10 == 0 {
                Some(format!("CHR>{}", i))
            } else {
                None
            },
            exclude: if i % 20 == 0 {
                Some(format!("INT<{}", i % 5))
            } else {
                None
            },
            effect: Some(EventEffect {
                chr: if i % 7 == 0 { 10 } else { 0 },
                int: if i % 7 == 1 { 10 } else { 0 },
                str_: if i % 7 == 2 { -30 } else { 0 },
                mny: if i % 7 == 3 { 10 } else { 0 },
                spr: if i % 7 == 4 { 1 } else { 0 },
                rdm: 0,
            }),
            post_event: None,
            branch: Vec::new(),
            group: if i % 3 == 0 {
                Some(format!("group{}", i % 9))
            } else {
                None
            },
            chance: if i % 2 == 0 { 0.5 } else { 1.0 },
            ends_life: false,
            repeatable: i % 4 == 0,
            no_random: false,
        })
        .collect();

    let judge: JudgeTable = serde_json::from_str(
        r#"{
            "CHR": [{"min": 0, "grade": 0, "text": "c"}],
            "INT": [{"min": 0, "grade": 0, "text": "i"}],
            "STR": [{"min": 0, "grade": 0, "text": "s"}],
            "MNY": [{"min": 0, "grade": 0, "text": "m"}],
            "SPR": [{"min": 0, "grade": 0, "text": "p"}],
            "AGE": [{"min": 0, "grade": 0, "text": "a"}],
            "SUM": [{"min": 0, "grade": 0, "text": "t"}]
        }"#,
    )
    .unwrap();

    Arc::new(GameData::new(talents, events, judge).unwrap())
}

fn benchmark_simulation(c: &mut Criterion) {
    let data = GameData::builtin().unwrap();
    let attributes = AttributeSet::new(2500, 2500, 2500, 2500, 5);
    let talent_ids = vec![1001, 1014, 1027];

    c.bench_function("simulate_full_life", |b| {
        let mut engine = LifeEngine::with_seed(Arc::clone(&data), EngineConfig::default(), 7);
        b.iter(|| {
            let history = engine.simulate(black_box(attributes), black_box(&talent_ids));
            black_box(history)
        })
    });

    let synthetic = create_test_data();
    c.bench_function("simulate_full_life_large_data", |b| {
        let mut engine = LifeEngine::with_seed(Arc::clone(&synthetic), EngineConfig::default(), 7);
        b.iter(|| {
            let history = engine.simulate(black_box(attributes), black_box(&[1, 2, 3]));
            black_box(history)
        })
    });
}

fn benchmark_summary_and_draw(c: &mut Criterion) {
    let mut engine = LifeEngine::builtin(Some(11)).unwrap();
    engine
        .simulate(AttributeSet::new(2500, 2500, 2500, 2500, 5), &[])
        .unwrap();

    c.bench_function("summary", |b| b.iter(|| black_box(engine.summary())));
    c.bench_function("talent_draw", |b| b.iter(|| black_box(engine.draw(10))));
}

fn benchmark_condition_parsing(c: &mut Criterion) {
    let conditions = vec![
        "CHR>5",
        "CHR>5 & INT<10",
        "CHR>5 | INT<10",
        "AGE>=18 & CHR>5 & (TLT?[1001] | EVT?[10001])",
        "MNY>=1500 & INT>=1000 & STR>0",
    ];

    c.bench_function("condition_parsing_cold", |b| {
        b.iter(|| {
            for cond in &conditions {
                let _ = black_box(parse(cond));
            }
        })
    });

    c.bench_function("condition_parsing_cached", |b| {
        let cache = ConditionCache::new();
        // Warm up cache
        for cond in &conditions {
            let _ = cache.get_or_parse(cond);
        }

        b.iter(|| {
            for cond in &conditions {
                let _ = black_box(cache.get_or_parse(cond));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_simulation,
    benchmark_summary_and_draw,
    benchmark_condition_parsing
);
criterion_main!(benches);
