//! Property-based tests for the chain accumulator.

use std::rc::Rc;

use logchain::{Emitter, Mode, RecordState, Stack, Style};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Mode(usize),
    Style(usize),
    Emitter(usize),
    Chain(usize),
}

struct Vocabulary {
    modes: Vec<Rc<Mode>>,
    styles: Vec<Rc<Style>>,
    emitters: Vec<Rc<Emitter>>,
}

impl Vocabulary {
    fn new() -> Self {
        Self {
            modes: ["verbose", "debug", "trace"]
                .iter()
                .map(|n| Rc::new(Mode::named(*n).unwrap()))
                .collect(),
            styles: ["red", "bold", "dim"]
                .iter()
                .map(|n| Rc::new(Style::plain(*n).unwrap()))
                .collect(),
            emitters: ["info", "warn", "error"]
                .iter()
                .map(|n| Rc::new(Emitter::named(*n).unwrap()))
                .collect(),
        }
    }

    fn apply(&self, stack: &mut Stack, op: &Op) {
        match op {
            Op::Mode(i) => stack.add_mode(self.modes[*i].clone()),
            Op::Style(i) => stack.add_style(self.styles[*i].clone()),
            Op::Emitter(i) => stack.add_emitter(self.emitters[*i].clone()),
            Op::Chain(i) => stack.chain_emitter(self.emitters[*i].clone()),
        };
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3usize).prop_map(Op::Mode),
        (0..3usize).prop_map(Op::Style),
        (0..3usize).prop_map(Op::Emitter),
        (0..3usize).prop_map(Op::Chain),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Modes keep first-insertion order and never repeat.
    #[test]
    fn modes_are_an_ordered_set(indices in prop::collection::vec(0..3usize, 0..30)) {
        let vocab = Vocabulary::new();
        let mut stack = Stack::new();
        let mut expected: Vec<&str> = Vec::new();
        for i in &indices {
            stack.add_mode(vocab.modes[*i].clone());
            let name = vocab.modes[*i].name();
            if !expected.contains(&name) {
                expected.push(name);
            }
        }
        prop_assert_eq!(stack.current().mode_names(), expected);
    }

    /// Each access grows the stack by exactly one record when the current
    /// record is named, and by none otherwise.
    #[test]
    fn accesses_fork_only_after_named(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let vocab = Vocabulary::new();
        let mut stack = Stack::new();
        for op in &ops {
            let before = stack.len();
            let was_named = stack.current().is_named();
            vocab.apply(&mut stack, op);
            let grew = stack.len() - before;
            prop_assert_eq!(grew, usize::from(was_named));
        }
    }

    /// Only the last record may be open.
    #[test]
    fn finished_records_are_named(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let vocab = Vocabulary::new();
        let mut stack = Stack::new();
        for op in &ops {
            vocab.apply(&mut stack, op);
        }
        let items: Vec<_> = stack.items().collect();
        for record in &items[..items.len() - 1] {
            prop_assert_eq!(record.state(), RecordState::Named);
        }
    }

    /// Chaining after a named record copies its modes and styles.
    #[test]
    fn chain_fork_inherits(
        ops in prop::collection::vec(op_strategy(), 0..20),
        next in 0..3usize,
    ) {
        let vocab = Vocabulary::new();
        let mut stack = Stack::new();
        for op in &ops {
            vocab.apply(&mut stack, op);
        }
        stack.chain_emitter(vocab.emitters[0].clone());
        let modes: Vec<String> = stack.current().mode_names().iter().map(|s| s.to_string()).collect();
        let styles: Vec<String> = stack.current().style_names().iter().map(|s| s.to_string()).collect();

        stack.chain_emitter(vocab.emitters[next].clone());
        prop_assert_eq!(stack.current().mode_names(), modes);
        prop_assert_eq!(stack.current().style_names(), styles);
    }

    /// Draining always leaves exactly one fresh open record.
    #[test]
    fn process_resets_stack(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let vocab = Vocabulary::new();
        let mut stack = Stack::new();
        for op in &ops {
            vocab.apply(&mut stack, op);
        }
        let expected = stack.len();
        let mut visited = 0;
        stack.process(|_| visited += 1);

        prop_assert_eq!(visited, expected);
        prop_assert_eq!(stack.len(), 1);
        prop_assert_eq!(stack.current().state(), RecordState::Open);
        prop_assert!(stack.current().modes().is_empty());
        prop_assert!(stack.current().styles().is_empty());
    }
}
