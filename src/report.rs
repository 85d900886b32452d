//! Structured reporting of preprocessing and query experiments.
//!
//! Values are collected into a JSON object roughly isomorph to the call graph
//! (RAII guards open nested contexts) and printed when reporting is dropped.
//! Reporting is inactive unless `enable_reporting` was called, so library code
//! can report unconditionally.

use serde_json::{Map, Value};
use std::{cell::RefCell, mem::swap};

use crate::report;

pub use serde_json::json;

#[derive(Debug, Default)]
struct Reporter {
    current: Map<String, Value>,
    context_stack: Vec<(String, Map<String, Value>)>,
}

impl Reporter {
    fn push_context(&mut self, key: String) {
        let mut parent = Map::new();
        swap(&mut parent, &mut self.current);
        self.context_stack.push((key, parent));
    }

    fn pop_context(&mut self) {
        let (key, mut parent) = self.context_stack.pop().expect("tried to pop from empty context stack");
        swap(&mut parent, &mut self.current);
        self.current.insert(key, Value::Object(parent));
    }

    fn report(&mut self, key: String, val: Value) {
        self.current.insert(key, val);
    }
}

thread_local! {
    static REPORTER: RefCell<Option<Reporter>> = RefCell::new(None);
}

#[must_use]
pub struct ContextGuard(());

impl Drop for ContextGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| {
            if let Some(r) = reporter.borrow_mut().as_mut() {
                r.pop_context()
            }
        });
    }
}

/// Open a nested reporting context under the given key.
/// The context is closed when the guard goes out of scope.
pub fn push_context(key: &str) -> ContextGuard {
    REPORTER.with(|reporter| {
        if let Some(r) = reporter.borrow_mut().as_mut() {
            r.push_context(key.to_string())
        }
    });
    ContextGuard(())
}

pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    REPORTER.with(|reporter| {
        if let Some(r) = reporter.borrow_mut().as_mut() {
            r.report(key, val)
        }
    });
}

#[must_use]
pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTER.with(|reporter| {
            if let Some(mut r) = reporter.borrow_mut().take() {
                assert!(r.context_stack.is_empty());
                let mut object = Map::new();
                swap(&mut object, &mut r.current);
                println!("{}", Value::Object(object));
            };
        });
    }
}

/// Activate reporting for the current thread.
/// The collected JSON object is printed to stdout when the guard is dropped.
pub fn enable_reporting(program: &str) -> ReportingGuard {
    REPORTER.with(|reporter| reporter.replace(Some(Reporter::default())));

    report!("program", program);
    report!("args", std::env::args().collect::<Vec<String>>());

    ReportingGuard(())
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => { $crate::report::report($k.to_string(), $crate::report::json!($($json)+)) };
}

pub mod benchmark;
pub use benchmark::*;
