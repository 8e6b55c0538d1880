//! Property-based invariant tests for the select engine.
//!
//! These tests verify structural invariants of `Select<T>`:
//!
//! 1. Circular navigation returns to the start after one full lap
//! 2. Home and End land on the first and last enabled items
//! 3. The highlight always indexes into the item sequence
//! 4. Keyboard navigation never highlights a disabled item
//! 5. An identity reducer is indistinguishable from no reducer
//! 6. A selecting key commits exactly one state change
//! 7. A controlled highlight is clamped to the items, whatever its value

use std::cell::Cell;
use std::rc::Rc;

use ftui_select::event::{ElementRole, InputEvent, KeyCode};
use ftui_select::{Action, Select, SelectConfig, SelectionState, StateChanges};
use proptest::prelude::*;
use web_time::Instant;

// ── Strategies ──────────────────────────────────────────────────────────

/// Raw inputs a user can deliver to the widget.
#[derive(Debug, Clone)]
enum Op {
    Toggle(KeyCode),
    Menu(KeyCode),
    ToggleClick,
    ItemClick(usize),
    ItemHover(usize),
    PointerLeave,
    Blur,
}

fn key_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Up),
        Just(KeyCode::Down),
        Just(KeyCode::Home),
        Just(KeyCode::End),
        Just(KeyCode::PageUp),
        Just(KeyCode::PageDown),
        Just(KeyCode::Enter),
        Just(KeyCode::Escape),
        Just(KeyCode::Tab),
        prop::sample::select(vec!['a', 'b', 'c', ' ']).prop_map(KeyCode::Char),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => key_strategy().prop_map(Op::Toggle),
        6 => key_strategy().prop_map(Op::Menu),
        1 => Just(Op::ToggleClick),
        1 => (0usize..40).prop_map(Op::ItemClick),
        1 => (0usize..40).prop_map(Op::ItemHover),
        1 => Just(Op::PointerLeave),
        1 => Just(Op::Blur),
    ]
}

/// Items labelled with a leading letter so type-ahead has matches.
fn labels(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}{i}", ['a', 'b', 'c'][i % 3]))
        .collect()
}

/// Apply `ops` at a fixed instant so type-ahead windows never expire.
fn apply_ops<E: ftui_select::Environment>(select: &mut Select<String, E>, ops: &[Op], now: Instant) {
    for op in ops {
        let (role, event) = match op {
            Op::Toggle(code) => (ElementRole::ToggleButton, InputEvent::key_code(*code)),
            Op::Menu(code) => (ElementRole::Menu, InputEvent::key_code(*code)),
            Op::ToggleClick => (ElementRole::ToggleButton, InputEvent::click()),
            Op::ItemClick(index) => (ElementRole::Item(*index), InputEvent::click()),
            Op::ItemHover(index) => (ElementRole::Item(*index), InputEvent::pointer_move()),
            Op::PointerLeave => (ElementRole::Menu, InputEvent::pointer_leave()),
            Op::Blur => (ElementRole::Menu, InputEvent::blur(Some("outside"))),
        };
        // The menu and its items only receive input while rendered, and
        // items outside the sequence have inert bundles.
        let delivered = match role {
            ElementRole::Menu => select.is_open(),
            ElementRole::Item(index) => select.is_open() && index < select.items().len(),
            _ => true,
        };
        if !delivered {
            continue;
        }
        select.handle_input_at(role, &event, now);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Circular navigation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn full_lap_returns_to_start(count in 1usize..=50, start in 0usize..50) {
        let start = start % count;
        let mut select = Select::new(SelectConfig::new(labels(count)));
        select.open_menu();
        select.set_highlighted_index(Some(start));
        for _ in 0..count {
            select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Down));
        }
        prop_assert_eq!(select.highlighted_index(), Some(start));
        for _ in 0..count {
            select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Up));
        }
        prop_assert_eq!(select.highlighted_index(), Some(start));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Home and End
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn home_and_end_hit_the_edges(count in 1usize..=50, start in 0usize..50) {
        let mut select = Select::new(SelectConfig::new(labels(count)));
        select.open_menu();
        select.set_highlighted_index(Some(start % count));
        select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::End));
        prop_assert_eq!(select.highlighted_index(), Some(count - 1));
        select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Home));
        prop_assert_eq!(select.highlighted_index(), Some(0));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Highlight stays in range
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn highlight_always_in_range(
        count in 0usize..40,
        circular in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let config = SelectConfig::new(labels(count)).with_circular_navigation(circular);
        let mut select = Select::new(config);
        apply_ops(&mut select, &ops, Instant::now());
        if let Some(index) = select.highlighted_index() {
            prop_assert!(
                index < count,
                "highlight {} out of range (count={})", index, count
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Disabled items
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn keyboard_never_highlights_disabled(
        disabled in prop::collection::vec(any::<bool>(), 1..30),
        enabled in 0usize..30,
        ops in prop::collection::vec(key_strategy(), 0..150),
    ) {
        let mut disabled = disabled;
        let count = disabled.len();
        disabled[enabled % count] = false;
        let mask = disabled.clone();
        let config = SelectConfig::new(labels(count))
            .with_item_disabled(move |_, index| mask[index]);
        let mut select = Select::new(config);

        let now = Instant::now();
        for (step, code) in ops.iter().enumerate() {
            let role = if step % 4 == 0 { ElementRole::ToggleButton } else { ElementRole::Menu };
            select.handle_input_at(role, &InputEvent::key_code(*code), now);
            if let Some(index) = select.highlighted_index() {
                prop_assert!(
                    !disabled[index],
                    "disabled item {} highlighted after {:?}", index, code
                );
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Identity reducer
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn identity_reducer_changes_nothing(
        count in 0usize..30,
        ops in prop::collection::vec(op_strategy(), 0..150),
    ) {
        let now = Instant::now();
        let mut plain = Select::new(SelectConfig::new(labels(count)));
        let mut reduced = Select::new(SelectConfig::new(labels(count)).with_state_reducer(
            |_: &SelectionState<String>, _: &Action<String>, changes: StateChanges<String>| changes,
        ));
        apply_ops(&mut plain, &ops, now);
        apply_ops(&mut reduced, &ops, now);
        prop_assert_eq!(plain.state(), reduced.state());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. One commit per selecting key
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enter_commits_exactly_once(count in 1usize..30, target in 0usize..30) {
        let commits = Rc::new(Cell::new(0usize));
        let sink = Rc::clone(&commits);
        let config = SelectConfig::new(labels(count)).on_state_change(move |_| {
            sink.set(sink.get() + 1);
        });
        let mut select = Select::new(config);
        select.open_menu();
        select.set_highlighted_index(Some(target % count));
        commits.set(0);

        select.handle_input(ElementRole::Menu, &InputEvent::key_code(KeyCode::Enter));
        prop_assert_eq!(commits.get(), 1);
        prop_assert!(!select.is_open());
        let expected = labels(count).swap_remove(target % count);
        prop_assert_eq!(select.selected_item(), Some(&expected));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Controlled highlight
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn controlled_highlight_stays_in_range(
        count in 0usize..20,
        shrunk in 0usize..20,
        controlled in prop_oneof![Just(usize::MAX), 0usize..40],
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let config = SelectConfig::new(labels(count)).with_highlighted_index(Some(controlled));
        let mut select = Select::new(config);
        let expected = |len: usize| len.checked_sub(1).map(|last| controlled.min(last));
        prop_assert_eq!(select.highlighted_index(), expected(count));

        apply_ops(&mut select, &ops, Instant::now());
        prop_assert_eq!(select.highlighted_index(), expected(count));

        select.set_items(labels(shrunk));
        prop_assert_eq!(select.highlighted_index(), expected(shrunk));
    }
}
