// Edit sessions as seen from the outside: observer events, committed edit
// groups and replaying them for undo and redo

use std::cell::RefCell;
use std::rc::Rc;

use editor_text_core::{
    AttributeRun, BufferObserver, Document, EditCommand, EditError, EditGroup, LineRange,
    LineStore, TextPos, TextRange,
};

#[derive(Default)]
struct EventLog {
    events: RefCell<Vec<String>>,
    groups: RefCell<Vec<EditGroup>>,
}

impl BufferObserver for EventLog {
    fn text_inserted(&self, range: TextRange) {
        self.events.borrow_mut().push(format!("inserted {}", range));
    }

    fn text_removed(&self, range: TextRange, text: &str) {
        self.events
            .borrow_mut()
            .push(format!("removed {} {:?}", range, text));
    }

    fn lines_touched(&self, lines: LineRange) {
        self.events
            .borrow_mut()
            .push(format!("touched {}..={}", lines.start, lines.end));
    }

    fn edit_group_committed(&self, revision: u64, group: &EditGroup) {
        self.events.borrow_mut().push(format!("committed {}", revision));
        self.groups.borrow_mut().push(group.clone());
    }

    fn marks_changed(&self) {
        self.events.borrow_mut().push("marks".to_string());
    }

    fn about_to_invalidate_moving_content(&self) {
        self.events.borrow_mut().push("invalidate".to_string());
    }
}

fn observed(text: &str) -> (Document, Rc<EventLog>) {
    let mut doc = Document::from_text(text);
    let log = Rc::new(EventLog::default());
    doc.add_observer(log.clone());
    (doc, log)
}

#[test]
fn test_session_reports_touched_lines_once() {
    let (mut doc, log) = observed("one\ntwo\nthree");

    doc.edit_start();
    doc.edit_insert_text(0, 3, "!").unwrap();
    doc.edit_remove_text(2, 0, 2).unwrap();
    doc.edit_end();

    assert_eq!(
        *log.events.borrow(),
        vec![
            "inserted [(0, 3) -> (0, 4)]",
            "removed [(2, 0) -> (2, 2)] \"th\"",
            "touched 0..=2",
            "committed 1",
        ]
    );
}

#[test]
fn test_touched_span_follows_line_changes() {
    let (mut doc, log) = observed("a\nb\nc\nd");

    doc.edit_start();
    doc.edit_insert_text(3, 0, "x").unwrap();
    doc.edit_unwrap_line(0, true, 1).unwrap();
    doc.edit_end();

    assert!(log
        .events
        .borrow()
        .contains(&"touched 0..=2".to_string()));
}

#[test]
fn test_rejected_edit_is_silent() {
    let (mut doc, log) = observed("abc");

    assert_eq!(
        doc.edit_insert_text(5, 0, "x"),
        Err(EditError::LineOutOfRange { line: 5, count: 1 })
    );
    assert!(doc.edit_remove_text(0, 3, 1).is_err());
    assert!(doc.edit_unwrap_line(0, true, 0).is_err());

    assert!(log.events.borrow().is_empty());
    assert_eq!(doc.revision(), 0);
}

#[test]
fn test_wrap_reports_line_break_insert() {
    let (mut doc, log) = observed("hello world");

    doc.edit_wrap_line(0, 5, false).unwrap();

    assert_eq!(log.events.borrow()[0], "inserted [(0, 5) -> (1, 0)]");
    assert_eq!(doc.text(), "hello\n world");
}

#[test]
fn test_undo_and_redo_committed_group() {
    let (mut doc, log) = observed("hello world\nsecond");

    doc.replace_text(TextRange::on_line(0, 6, 11), "there\nfriend", false)
        .unwrap();
    assert_eq!(doc.text(), "hello there\nfriend\nsecond");

    let group = log.groups.borrow()[0].clone();
    assert_eq!(group.revision, 1);
    assert_eq!(
        group.commands[0],
        EditCommand::RemoveText {
            line: 0,
            col: 6,
            text: "world".to_string()
        }
    );

    group.undo(&mut doc).unwrap();
    assert_eq!(doc.text(), "hello world\nsecond");
    assert_eq!(doc.revision(), 2);

    group.redo(&mut doc).unwrap();
    assert_eq!(doc.text(), "hello there\nfriend\nsecond");
}

#[test]
fn test_undo_of_wrap_onto_existing_line() {
    let (mut doc, log) = observed("one two\nthree");

    doc.edit_wrap_line(0, 4, false).unwrap();
    assert_eq!(doc.text(), "one \ntwothree");

    let group = log.groups.borrow()[0].clone();
    group.undo(&mut doc).unwrap();
    assert_eq!(doc.text(), "one two\nthree");
}

#[test]
fn test_undo_of_wrap_onto_empty_line() {
    let (mut doc, log) = observed("one two\n");

    doc.edit_wrap_line(0, 4, false).unwrap();
    assert_eq!(doc.text(), "one \ntwo");

    let group = log.groups.borrow()[0].clone();
    group.undo(&mut doc).unwrap();
    assert_eq!(doc.text(), "one two\n");
}

#[test]
fn test_partial_unwrap_reports_both_line_breaks() {
    let (mut doc, log) = observed("foo\nbarbaz");

    doc.edit_unwrap_line(0, false, 3).unwrap();

    assert_eq!(doc.text(), "foobar\nbaz");
    assert_eq!(
        log.events.borrow()[..3],
        [
            "inserted [(1, 3) -> (2, 0)]",
            "removed [(0, 3) -> (1, 0)] \"\\n\"",
            "touched 0..=1",
        ]
    );

    let group = log.groups.borrow()[0].clone();
    assert_eq!(
        group.commands,
        vec![EditCommand::UnwrapLine {
            line: 0,
            length: 3,
            next_length: 3,
            remove_line: false,
        }]
    );
    group.undo(&mut doc).unwrap();
    assert_eq!(doc.text(), "foo\nbarbaz");
}

#[test]
fn test_undo_of_removed_lines() {
    let (mut doc, log) = observed("a\nb\nc\nd");

    doc.edit_remove_lines(1, 3).unwrap();
    assert_eq!(doc.text(), "a");

    let group = log.groups.borrow()[0].clone();
    group.undo(&mut doc).unwrap();
    assert_eq!(doc.text(), "a\nb\nc\nd");
}

#[test]
fn test_clear_announces_invalidation() {
    let (mut doc, log) = observed("a\nb");
    doc.add_mark(1, 1);
    log.events.borrow_mut().clear();

    doc.clear().unwrap();

    let events = log.events.borrow();
    assert_eq!(events[0], "marks");
    assert_eq!(events[1], "invalidate");
    assert_eq!(doc.text(), "");
}

#[test]
fn test_wrap_then_unwrap_restores_text_and_runs() {
    let mut store = LineStore::from_text("abcdefg");
    let runs = vec![AttributeRun::new(0, 3, 1), AttributeRun::new(3, 4, 2)];
    store
        .line_mut(0)
        .expect("first line exists")
        .set_attributes(runs.clone());

    store.wrap_line(TextPos::new(0, 5)).unwrap();
    assert_eq!(store.text(), "abcde\nfg");
    assert_eq!(
        store.line(1).unwrap().attributes(),
        &[AttributeRun::new(0, 2, 2)]
    );

    store.unwrap_line(1).unwrap();
    assert_eq!(store.text(), "abcdefg");
    assert_eq!(store.line(0).unwrap().attributes(), runs.as_slice());
}

#[test]
fn test_insert_extends_matching_run() {
    let mut store = LineStore::from_text("abcde");
    store
        .line_mut(0)
        .unwrap()
        .set_attributes(vec![AttributeRun::new(0, 3, 1), AttributeRun::new(3, 2, 2)]);

    store
        .insert_text_with_attribute(TextPos::new(0, 3), "xy", 1)
        .unwrap();

    assert_eq!(
        store.line(0).unwrap().attributes(),
        &[AttributeRun::new(0, 5, 1), AttributeRun::new(5, 2, 2)]
    );
}
