//! The chain accumulator.
//!
//! A [`Stack`] holds the records produced by one fluent chain. Every mutation
//! first looks at the current record: if it is already named, the chain has
//! moved past it and a new record is started before the mutation is applied.
//!
//! Forks come in two flavours:
//!
//! | Operation | Fork when current is named |
//! |-----------|----------------------------|
//! | [`add_mode`](Stack::add_mode) | fresh record |
//! | [`add_style`](Stack::add_style) | fresh record |
//! | [`add_emitter`](Stack::add_emitter) | fresh record |
//! | [`chain_emitter`](Stack::chain_emitter) | record inheriting current modes and styles |
//! | [`set_name`](Stack::set_name) | inheriting record, unless current already carries the emitter |
//!
//! This is what lets `verbose.red.error.warn("foo")` emit `warn` with
//! `verbose` and `red` still active, while `write(); other()` start clean.

use std::mem;
use std::rc::Rc;

use crate::descriptor::{Emitter, Mode, Style};
use crate::record::Record;

/// Ordered records of a chain. Never empty; the last record is current.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    previous: Vec<Record>,
    current: Record,
}

impl Stack {
    /// Creates a stack holding a single open record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Record {
        &self.current
    }

    /// All records, oldest first. The last one is [`current`](Stack::current).
    pub fn items(&self) -> impl Iterator<Item = &Record> {
        self.previous.iter().chain(std::iter::once(&self.current))
    }

    pub fn len(&self) -> usize {
        self.previous.len() + 1
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn fork(&mut self, inherit: bool) {
        let next = if inherit {
            Record::with_parent(&self.current)
        } else {
            Record::new()
        };
        tracing::trace!(inherit, depth = self.len(), "forking chain record");
        let done = mem::replace(&mut self.current, next);
        self.previous.push(done);
    }

    fn fork_if_named(&mut self, inherit: bool) {
        if self.current.is_named() {
            self.fork(inherit);
        }
    }

    pub fn add_mode(&mut self, mode: Rc<Mode>) -> &mut Self {
        self.fork_if_named(false);
        self.current.add_mode(mode);
        self
    }

    pub fn add_style(&mut self, style: Rc<Style>) -> &mut Self {
        self.fork_if_named(false);
        self.current.add_style(style);
        self
    }

    /// Removes a style from the current record while it is still open.
    ///
    /// Named records are never modified.
    pub fn remove_style(&mut self, name: &str) -> bool {
        if self.current.is_named() {
            return false;
        }
        self.current.remove_style(name)
    }

    /// Attaches an emitter that stands alone: if the current record is
    /// already named, the new record starts empty.
    pub fn add_emitter(&mut self, emitter: Rc<Emitter>) -> &mut Self {
        self.fork_if_named(false);
        self.current.attach_emitter(emitter);
        self
    }

    /// Attaches an emitter that continues the chain: if the current record is
    /// already named, the new record inherits its modes and styles.
    pub fn chain_emitter(&mut self, emitter: Rc<Emitter>) -> &mut Self {
        self.fork_if_named(true);
        self.current.attach_emitter(emitter);
        self
    }

    /// Names the current record after `emitter`.
    ///
    /// A no-op when the current record already carries this emitter. A record
    /// named by another emitter is left as is and continued by an inheriting
    /// one.
    pub fn set_name(&mut self, emitter: Rc<Emitter>) -> &mut Self {
        let already = self
            .current
            .emitter()
            .is_some_and(|e| Rc::ptr_eq(e, &emitter));
        if !already {
            self.fork_if_named(true);
            self.current.attach_emitter(emitter);
        }
        self
    }

    /// Takes every record out, leaving a single fresh open record.
    pub fn drain(&mut self) -> Vec<Record> {
        let mut items = mem::take(&mut self.previous);
        items.push(mem::take(&mut self.current));
        items
    }

    /// Drains the stack, then calls `f` once per record in order.
    ///
    /// The swap happens before the first call, so anything `f` records on
    /// this stack lands in the fresh state.
    pub fn process<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(Record),
    {
        self.drain().into_iter().for_each(f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::EmitterOptions;
    use crate::record::RecordState;

    fn mode(name: &str) -> Rc<Mode> {
        Rc::new(Mode::named(name).unwrap())
    }

    fn style(name: &str) -> Rc<Style> {
        Rc::new(Style::plain(name).unwrap())
    }

    fn emitter(name: &str, priority: i32) -> Rc<Emitter> {
        Rc::new(Emitter::new(EmitterOptions::new().name(name).priority(priority)).unwrap())
    }

    #[test]
    fn test_new_stack_has_one_open_record() {
        let stack = Stack::new();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current().state(), RecordState::Open);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_add_mode_to_current() {
        let mut stack = Stack::new();
        let verbose = mode("verbose");
        stack.add_mode(verbose.clone());
        assert_eq!(stack.current().mode_names(), vec!["verbose"]);
        assert!(Rc::ptr_eq(&stack.current().modes()[0], &verbose));
    }

    #[test]
    fn test_add_style_to_current() {
        let mut stack = Stack::new();
        stack.add_style(style("red"));
        assert_eq!(stack.current().style_names(), vec!["red"]);
    }

    #[test]
    fn test_add_emitter_sets_name() {
        let mut stack = Stack::new();
        stack.add_emitter(emitter("error", 0));
        assert_eq!(stack.current().name(), Some("error"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_add_emitter_starts_clean_record_when_named() {
        let mut stack = Stack::new();
        stack.add_mode(mode("verbose"));
        stack.add_style(style("red"));
        stack.add_emitter(emitter("error", 0));
        assert_eq!(stack.current().name(), Some("error"));
        assert_eq!(stack.current().mode_names(), vec!["verbose"]);
        assert_eq!(stack.current().style_names(), vec!["red"]);

        stack.add_emitter(emitter("warn", 1));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current().name(), Some("warn"));
        assert!(stack.current().mode_names().is_empty());
        assert!(stack.current().style_names().is_empty());
    }

    #[test]
    fn test_chain_emitter_inherits_from_named_record() {
        // verbose.red.error.warn("foo")
        let mut stack = Stack::new();
        stack.add_mode(mode("verbose"));
        stack.add_style(style("red"));
        stack.chain_emitter(emitter("error", 0));
        stack.chain_emitter(emitter("warn", 1));

        let items: Vec<&Record> = stack.items().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name(), Some("error"));
        assert_eq!(items[0].mode_names(), vec!["verbose"]);
        assert_eq!(items[0].style_names(), vec!["red"]);
        assert_eq!(items[1].name(), Some("warn"));
        assert_eq!(items[1].mode_names(), vec!["verbose"]);
        assert_eq!(items[1].style_names(), vec!["red"]);
    }

    #[test]
    fn test_mode_after_named_record_forks_fresh() {
        let mut stack = Stack::new();
        stack.add_mode(mode("verbose"));
        stack.chain_emitter(emitter("info", 5));
        stack.add_mode(mode("debug"));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current().mode_names(), vec!["debug"]);
        assert_eq!(stack.current().state(), RecordState::Open);
    }

    #[test]
    fn test_style_after_named_record_forks_fresh() {
        let mut stack = Stack::new();
        stack.add_style(style("red"));
        stack.chain_emitter(emitter("info", 5));
        stack.add_style(style("bold"));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.current().style_names(), vec!["bold"]);
    }

    #[test]
    fn test_set_name_does_not_fork() {
        let mut stack = Stack::new();
        let log = emitter("log", 100);
        stack.add_mode(mode("debug"));
        stack.set_name(log.clone());
        stack.set_name(log);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current().name(), Some("log"));
        assert_eq!(stack.current().mode_names(), vec!["debug"]);
    }

    #[test]
    fn test_set_name_never_renames_named_record() {
        let mut stack = Stack::new();
        stack.add_mode(mode("verbose"));
        stack.chain_emitter(emitter("error", 0));
        stack.set_name(emitter("warn", 1));

        let names: Vec<_> = stack.items().map(|r| r.name()).collect();
        assert_eq!(names, vec![Some("error"), Some("warn")]);
        assert_eq!(stack.current().mode_names(), vec!["verbose"]);
    }

    #[test]
    fn test_remove_style_only_on_open_record() {
        let mut stack = Stack::new();
        stack.add_style(style("red"));
        assert!(stack.remove_style("red"));

        stack.add_style(style("red"));
        stack.add_emitter(emitter("info", 5));
        assert!(!stack.remove_style("red"));
        assert_eq!(stack.current().style_names(), vec!["red"]);
    }

    #[test]
    fn test_process_visits_items_in_order_and_resets() {
        let mut stack = Stack::new();
        stack.add_mode(mode("verbose"));
        stack.chain_emitter(emitter("error", 0));
        stack.chain_emitter(emitter("warn", 1));
        let expected: Vec<Option<String>> = stack
            .items()
            .map(|r| r.name().map(str::to_string))
            .collect();

        let mut seen = Vec::new();
        stack.process(|record| seen.push(record.name().map(str::to_string)));

        assert_eq!(seen, expected);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current().state(), RecordState::Open);
        assert!(stack.current().modes().is_empty());
    }

    #[test]
    fn test_drain_returns_records() {
        let mut stack = Stack::new();
        stack.add_emitter(emitter("a", 1));
        stack.add_emitter(emitter("b", 1));
        let drained = stack.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(stack.len(), 1);
    }
}
