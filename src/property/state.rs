//! Attribute sets, effects and the property state a life runs on

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five life attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    /// 颜值 (Charm)
    #[serde(rename = "CHR")]
    Chr,
    /// 智力 (Intelligence)
    #[serde(rename = "INT")]
    Int,
    /// 体质 (Constitution)
    #[serde(rename = "STR")]
    Str,
    /// 家境 (Family wealth)
    #[serde(rename = "MNY")]
    Mny,
    /// 快乐 (Happiness)
    #[serde(rename = "SPR")]
    Spr,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Chr,
        Attribute::Int,
        Attribute::Str,
        Attribute::Mny,
        Attribute::Spr,
    ];

    /// Attributes the player distributes the budget over. SPR is fixed at birth.
    pub const ALLOCATABLE: [Attribute; 4] = [
        Attribute::Chr,
        Attribute::Int,
        Attribute::Str,
        Attribute::Mny,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Attribute::Chr => "CHR",
            Attribute::Int => "INT",
            Attribute::Str => "STR",
            Attribute::Mny => "MNY",
            Attribute::Spr => "SPR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.as_bytes() {
            b"CHR" => Some(Attribute::Chr),
            b"INT" => Some(Attribute::Int),
            b"STR" => Some(Attribute::Str),
            b"MNY" => Some(Attribute::Mny),
            b"SPR" => Some(Attribute::Spr),
            _ => None,
        }
    }
}

/// Snapshot of the five attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeSet {
    #[serde(default, rename = "CHR")]
    pub chr: i32,
    #[serde(default, rename = "INT")]
    pub int: i32,
    #[serde(default, rename = "STR")]
    pub str_: i32,
    #[serde(default, rename = "MNY")]
    pub mny: i32,
    #[serde(default, rename = "SPR")]
    pub spr: i32,
}

impl AttributeSet {
    pub fn new(chr: i32, int: i32, str_: i32, mny: i32, spr: i32) -> Self {
        Self {
            chr,
            int,
            str_,
            mny,
            spr,
        }
    }

    #[inline]
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Chr => self.chr,
            Attribute::Int => self.int,
            Attribute::Str => self.str_,
            Attribute::Mny => self.mny,
            Attribute::Spr => self.spr,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Chr => &mut self.chr,
            Attribute::Int => &mut self.int,
            Attribute::Str => &mut self.str_,
            Attribute::Mny => &mut self.mny,
            Attribute::Spr => &mut self.spr,
        }
    }

    /// Sum of the allocatable fields (everything except SPR)
    pub fn allocated_total(&self) -> i32 {
        Attribute::ALLOCATABLE.iter().map(|a| self.get(*a)).sum()
    }
}

/// Signed attribute deltas carried by talents and events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(default, rename = "CHR")]
    pub chr: i32,
    #[serde(default, rename = "INT")]
    pub int: i32,
    #[serde(default, rename = "STR")]
    pub str_: i32,
    #[serde(default, rename = "MNY")]
    pub mny: i32,
    #[serde(default, rename = "SPR")]
    pub spr: i32,
    /// Delta applied to one randomly chosen attribute
    #[serde(default, rename = "RDM")]
    pub rdm: i32,
}

impl Effect {
    pub fn is_empty(&self) -> bool {
        self == &Effect::default()
    }
}

/// Mutable state of one life: age, attributes, talents held and events seen
#[derive(Debug, Clone, Default)]
pub struct PropertyState {
    pub age: i32,
    pub attributes: AttributeSet,
    /// Selected talents, in selection order
    pub tlt: Vec<i32>,
    /// Events fired so far, in firing order
    pub evt: Vec<i32>,
}

impl PropertyState {
    #[inline]
    pub fn new(attributes: AttributeSet, talents: &[i32]) -> Self {
        let mut tlt = Vec::with_capacity(talents.len());
        for id in talents {
            if !tlt.contains(id) {
                tlt.push(*id);
            }
        }
        Self {
            age: 0,
            attributes,
            tlt,
            evt: Vec::with_capacity(128),
        }
    }

    #[inline]
    pub fn change(&mut self, attribute: Attribute, delta: i32) {
        *self.attributes.get_mut(attribute) += delta;
    }

    /// Apply an effect field by field; RDM picks its target with `rng`
    pub fn apply_effect<R: Rng + ?Sized>(&mut self, effect: &Effect, rng: &mut R) {
        if effect.chr != 0 {
            self.change(Attribute::Chr, effect.chr);
        }
        if effect.int != 0 {
            self.change(Attribute::Int, effect.int);
        }
        if effect.str_ != 0 {
            self.change(Attribute::Str, effect.str_);
        }
        if effect.mny != 0 {
            self.change(Attribute::Mny, effect.mny);
        }
        if effect.spr != 0 {
            self.change(Attribute::Spr, effect.spr);
        }
        if effect.rdm != 0 {
            if let Some(target) = Attribute::ALL.choose(rng) {
                self.change(*target, effect.rdm);
            }
        }
    }

    /// Remember a fired event. Linear search is fine: a life sees ~100 events.
    #[inline]
    pub fn record_event(&mut self, event_id: i32) {
        if !self.evt.contains(&event_id) {
            self.evt.push(event_id);
        }
    }

    #[inline]
    pub fn has_event(&self, event_id: i32) -> bool {
        self.evt.contains(&event_id)
    }

    #[inline]
    pub fn has_talent(&self, talent_id: i32) -> bool {
        self.tlt.contains(&talent_id)
    }

    /// STR at or below zero ends a life
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.attributes.str_ <= 0
    }
}
