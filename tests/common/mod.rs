#![allow(dead_code)]

use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use stencil::ambient::AmbientContext;
use stencil::config::ProjectInfo;
use stencil::logger::{Level, LogSink};

/// Log sink keeping every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        let message = match cause {
            Some(cause) => format!("{message}: {cause}"),
            None => message.to_string(),
        };
        self.events.lock().unwrap().push((level, message));
    }

    fn is_enabled(&self, level: Level) -> bool {
        level != Level::Trace
    }
}

pub fn ambient(project: &ProjectInfo) -> AmbientContext {
    AmbientContext::capture(project, &IndexMap::<String, String>::new()).unwrap()
}
