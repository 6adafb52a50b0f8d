//! Seam for the card/deck collaborator.
//!
//! The simulation treats the deck as opaque: it advances it every tick,
//! embeds its serialized record in the player snapshot and asks it to resolve
//! card plays, which fire the before/on/after hooks around each play. The
//! effects of individual cards live behind those hooks.

use std::{collections::VecDeque, fmt, time::Duration};

use serde::{Deserialize, Serialize};
use skirmish_core::{CardId, EntityId, Vec2};

/// Card held by a deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Card {
    /// Identifier of the card.
    pub id: CardId,
    /// Mana spent when the card is played.
    pub cost: f32,
}

/// Shape of the input used to create a [`Deck`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckBlueprint {
    /// Cards in draw order.
    pub cards: Vec<Card>,
    /// Number of cards available to play at once.
    pub hand_size: usize,
}

impl Default for DeckBlueprint {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            hand_size: 4,
        }
    }
}

/// Description of a card play handed to hooks.
#[derive(Clone, Copy, Debug)]
pub struct CardPlay<'a> {
    /// Player playing the card.
    pub player: &'a EntityId,
    /// Card being played.
    pub card: &'a Card,
    /// Point the card is aimed at.
    pub target: Vec2,
}

/// Callback invoked around a card play.
pub type PlayHook = Box<dyn FnMut(&CardPlay<'_>)>;

/// Moment of a card play at which a hook runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayPhase {
    /// Before the card resolves.
    Before,
    /// While the card resolves.
    On,
    /// After the card resolved.
    After,
}

/// Handle that removes a hook registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HookHandle {
    phase: PlayPhase,
    id: u64,
}

/// Ordered hook lists for the three play phases.
#[derive(Default)]
pub struct PlayHooks {
    before: Vec<(u64, PlayHook)>,
    on: Vec<(u64, PlayHook)>,
    after: Vec<(u64, PlayHook)>,
    next_id: u64,
}

impl PlayHooks {
    /// Creates empty hook lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` for `phase`.
    pub fn subscribe(&mut self, phase: PlayPhase, hook: PlayHook) -> HookHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.hooks_mut(phase).push((id, hook));
        HookHandle { phase, id }
    }

    /// Removes a registration, returning whether it existed.
    pub fn unsubscribe(&mut self, handle: HookHandle) -> bool {
        let hooks = self.hooks_mut(handle.phase);
        let before = hooks.len();
        hooks.retain(|(id, _)| *id != handle.id);
        hooks.len() != before
    }

    /// Runs every hook of `phase` in registration order.
    pub fn fire(&mut self, phase: PlayPhase, play: &CardPlay<'_>) {
        for (_, hook) in self.hooks_mut(phase).iter_mut() {
            hook(play);
        }
    }

    fn hooks_mut(&mut self, phase: PlayPhase) -> &mut Vec<(u64, PlayHook)> {
        match phase {
            PlayPhase::Before => &mut self.before,
            PlayPhase::On => &mut self.on,
            PlayPhase::After => &mut self.after,
        }
    }
}

impl fmt::Debug for PlayHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayHooks")
            .field("before", &self.before.len())
            .field("on", &self.on.len())
            .field("after", &self.after.len())
            .finish()
    }
}

/// Contract the simulation expects from a deck collaborator.
pub trait DeckSystem {
    /// Advances any time-driven deck state.
    fn update(&mut self, dt: Duration);

    /// Produces the opaque record embedded in player snapshots.
    fn serialize(&self) -> serde_json::Value;

    /// Looks up a playable card.
    fn card(&self, id: &CardId) -> Option<&Card>;

    /// Resolves a paid-for play, firing the before, on and after hooks.
    fn resolve_play(&mut self, player: &EntityId, card: &CardId, target: Vec2);

    /// Registers a hook that runs before each play resolves.
    fn subscribe_before_play(&mut self, hook: PlayHook) -> HookHandle;

    /// Registers a hook that runs while each play resolves.
    fn subscribe_on_play(&mut self, hook: PlayHook) -> HookHandle;

    /// Registers a hook that runs after each play resolved.
    fn subscribe_after_play(&mut self, hook: PlayHook) -> HookHandle;

    /// Removes a hook registration.
    fn unsubscribe(&mut self, handle: HookHandle) -> bool;
}

/// Deck that cycles a fixed card list through a hand.
///
/// Played cards go to the bottom of the draw pile and the top card refills
/// the hand, so the sequence of playable cards is fully deterministic.
#[derive(Debug)]
pub struct Deck {
    id: String,
    hand: Vec<Card>,
    draw_pile: VecDeque<Card>,
    hooks: PlayHooks,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SerializedDeck<'a> {
    id: &'a str,
    hand: &'a [Card],
    draw_pile_size: usize,
}

impl Deck {
    /// Creates a deck dealing the first `hand_size` cards into the hand.
    #[must_use]
    pub fn new(id: impl Into<String>, blueprint: DeckBlueprint) -> Self {
        let mut draw_pile: VecDeque<Card> = blueprint.cards.into();
        let dealt = blueprint.hand_size.min(draw_pile.len());
        let hand = draw_pile.drain(..dealt).collect();
        Self {
            id: id.into(),
            hand,
            draw_pile,
            hooks: PlayHooks::new(),
        }
    }

    /// Cards currently playable.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }
}

impl DeckSystem for Deck {
    fn update(&mut self, _dt: Duration) {}

    fn serialize(&self) -> serde_json::Value {
        let record = SerializedDeck {
            id: &self.id,
            hand: &self.hand,
            draw_pile_size: self.draw_pile.len(),
        };
        serde_json::to_value(record).unwrap_or(serde_json::Value::Null)
    }

    fn card(&self, id: &CardId) -> Option<&Card> {
        self.hand.iter().find(|card| &card.id == id)
    }

    fn resolve_play(&mut self, player: &EntityId, card: &CardId, target: Vec2) {
        let Some(index) = self.hand.iter().position(|held| &held.id == card) else {
            return;
        };
        let played = self.hand.remove(index);

        let play = CardPlay {
            player,
            card: &played,
            target,
        };
        self.hooks.fire(PlayPhase::Before, &play);
        self.hooks.fire(PlayPhase::On, &play);
        self.hooks.fire(PlayPhase::After, &play);

        self.draw_pile.push_back(played);
        if let Some(next) = self.draw_pile.pop_front() {
            self.hand.push(next);
        }
    }

    fn subscribe_before_play(&mut self, hook: PlayHook) -> HookHandle {
        self.hooks.subscribe(PlayPhase::Before, hook)
    }

    fn subscribe_on_play(&mut self, hook: PlayHook) -> HookHandle {
        self.hooks.subscribe(PlayPhase::On, hook)
    }

    fn subscribe_after_play(&mut self, hook: PlayHook) -> HookHandle {
        self.hooks.subscribe(PlayPhase::After, hook)
    }

    fn unsubscribe(&mut self, handle: HookHandle) -> bool {
        self.hooks.unsubscribe(handle)
    }
}
