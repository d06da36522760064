#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_config::{FinderInit, SessionOptions};
use core_events::{Event, KeyCode, KeyEvent, KeyModifiers};
use core_session::{Control, Outcome, SessionController, SessionEnv};

pub const ANIMALS: [&str; 60] = [
    "Apes", "Badgers", "Bats", "Bears", "Bees", "Buffalo", "Camels", "Cats", "Cobras",
    "Crocodiles", "Crows", "Dogs", "Donkeys", "Eagles", "Elephants", "Elks", "Falcons",
    "Ferrets", "Fish", "Flamingos", "Foxes", "Frogs", "Geese", "Giraffes", "Goats",
    "Hippopotami", "Hyenas", "Jaguars", "Jellyfish", "Kangaroos", "Lemurs", "Leopards", "Lions",
    "Moles", "Monkeys", "Mules", "Otters", "Owls", "Oxen", "Parrots", "Pigs", "Porcupines",
    "Rabbits", "Rats", "Ravens", "Rhinoceroses", "Salmon", "Seals", "Sharks", "Sheep", "Snakes",
    "Spiders", "Squirrels", "Swans", "Tigers", "Toads", "Turkeys", "Turtles", "Wolves", "Zebras",
];

pub fn animals() -> Vec<String> {
    ANIMALS.iter().map(|s| s.to_string()).collect()
}

/// Session plus an in-memory terminal.
pub struct Harness {
    pub session: SessionController,
    pub out: Vec<u8>,
}

impl Harness {
    pub fn new(init: impl Into<FinderInit>) -> Self {
        Self::with_env(init, SessionEnv::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self::new(FinderInit::with_options(animals(), options))
    }

    pub fn with_env(init: impl Into<FinderInit>, env: SessionEnv) -> Self {
        let mut session = SessionController::new(init, env).unwrap();
        let mut out = Vec::new();
        session.start(&mut out).unwrap();
        Self { session, out }
    }

    /// Feed one event, then any synthetic follow-up the session left behind.
    pub fn send(&mut self, event: Event) -> Option<Outcome> {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            if let Control::Exit(outcome) = self.session.handle(&event, &mut self.out).unwrap() {
                return Some(outcome);
            }
            next = self.session.take_deferred();
        }
        None
    }

    /// Pending synthetic events only (as the runtime does after each turn).
    pub fn settle(&mut self) -> Option<Outcome> {
        let event = self.session.take_deferred()?;
        self.send(event)
    }

    pub fn key(&mut self, key: KeyEvent) -> Option<Outcome> {
        self.send(Event::Input(core_events::InputEvent::Key(key)))
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            let outcome = self.key(KeyEvent::char(c));
            assert!(outcome.is_none(), "typing {c:?} ended the session");
        }
    }

    pub fn ctrl(&mut self, c: char, times: usize) {
        for _ in 0..times {
            self.key(KeyEvent::ctrl(c));
        }
    }

    pub fn enter(&mut self) -> Outcome {
        self.key(KeyEvent::plain(KeyCode::Enter))
            .expect("return should finish the session")
    }

    pub fn screen(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

pub fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}
