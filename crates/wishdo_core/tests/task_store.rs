use std::collections::HashSet;
use wishdo_core::{Category, StepSource, TaskFilter, TaskId, TaskStore, ToggleOutcome};

fn ids(tasks: &[&wishdo_core::Task]) -> Vec<TaskId> {
    tasks.iter().map(|task| task.id().clone()).collect()
}

#[test]
fn blank_add_is_noop() {
    let mut store = TaskStore::new();

    assert_eq!(store.add(""), None);
    assert_eq!(store.add("   \n\t"), None);
    assert!(store.is_empty());
}

#[test]
fn add_prepends_trimmed_task_with_defaults() {
    let mut store = TaskStore::new();
    let first = store.add_at("first", 10).unwrap();
    let second = store.add_at("  buy milk  ", 20).unwrap();

    assert_eq!(store.len(), 2);
    let task = &store.tasks()[0];
    assert_eq!(task.id(), &second);
    assert_eq!(task.text(), "buy milk");
    assert!(!task.is_done());
    assert_eq!(task.category(), Category::Short);
    assert!(task.checklist().is_empty());
    assert_eq!(task.memo(), "");
    assert_eq!(task.created_at(), 20);
    assert_eq!(store.tasks()[1].id(), &first);
}

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let mut store = TaskStore::new();
    for round in 0..50 {
        let id = store.add_at(&format!("task {round}"), round).unwrap();
        if round % 3 == 0 {
            store.toggle_done(&id);
        }
        if round % 5 == 0 {
            store.remove(&id);
        }
        if round % 7 == 0 {
            store.set_category(&id, Category::Info);
        }
    }

    let unique: HashSet<_> = store.tasks().iter().map(|task| task.id().clone()).collect();
    assert_eq!(unique.len(), store.len());
}

#[test]
fn from_tasks_drops_repeated_ids() {
    let mut store = TaskStore::new();
    store.add_at("a", 0).unwrap();
    let mut tasks = store.tasks().to_vec();
    tasks.push(tasks[0].clone());

    let seeded = TaskStore::from_tasks(tasks);
    assert_eq!(seeded.len(), 1);
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut store = TaskStore::new();
    store.add_at("keep", 0).unwrap();

    assert!(!store.remove(&TaskId::from("missing")));
    assert_eq!(store.len(), 1);
}

#[test]
fn toggle_done_twice_restores_original_task() {
    let mut store = TaskStore::new();
    let id = store.add_at("twice", 0).unwrap();
    store.add_step(&id, "s");
    let original = store.get(&id).unwrap().clone();

    assert_eq!(store.toggle_done(&id), ToggleOutcome::Completed);
    assert_eq!(store.toggle_done(&id), ToggleOutcome::Reopened);
    assert_eq!(store.get(&id).unwrap(), &original);
    assert_eq!(
        store.toggle_done(&TaskId::from("missing")),
        ToggleOutcome::NotFound
    );
}

#[test]
fn set_category_always_clears_done() {
    let mut store = TaskStore::new();
    let id = store.add_at("x", 0).unwrap();

    store.toggle_done(&id);
    assert!(store.set_category(&id, Category::Long));
    let task = store.get(&id).unwrap();
    assert!(!task.is_done());
    assert_eq!(task.category(), Category::Long);

    assert!(store.set_category(&id, Category::Long));
    assert!(!store.get(&id).unwrap().is_done());
    assert!(!store.set_category(&TaskId::from("missing"), Category::Info));
}

#[test]
fn done_filter_ignores_category() {
    let mut store = TaskStore::new();
    let short = store.add_at("short", 0).unwrap();
    let info = store.add_at("info", 1).unwrap();
    let open = store.add_at("open", 2).unwrap();
    store.set_category(&info, Category::Info);
    store.toggle_done(&short);
    store.toggle_done(&info);

    let done = store.filtered(TaskFilter::Done);
    assert_eq!(ids(&done), vec![info.clone(), short.clone()]);
    assert_eq!(
        ids(&store.filtered(TaskFilter::Active(Category::Short))),
        vec![open]
    );
    assert!(store.filtered(TaskFilter::Active(Category::Info)).is_empty());
}

#[test]
fn active_filter_unaffected_by_other_categories() {
    let mut store = TaskStore::new();
    let a = store.add_at("a", 0).unwrap();
    let b = store.add_at("b", 1).unwrap();
    let other = store.add_at("other", 2).unwrap();
    store.set_category(&other, Category::Long);

    let before = ids(&store.filtered(TaskFilter::Active(Category::Short)));
    assert_eq!(before, vec![b, a]);

    store.remove(&other);
    let after = ids(&store.filtered(TaskFilter::Active(Category::Short)));
    assert_eq!(before, after);
}

#[test]
fn add_step_trims_and_ignores_blank() {
    let mut store = TaskStore::new();
    let id = store.add_at("x", 0).unwrap();

    assert!(!store.add_step(&id, "  "));
    assert!(store.add_step(&id, "  first  "));
    assert!(!store.add_step(&TaskId::from("missing"), "first"));

    let checklist = store.get(&id).unwrap().checklist();
    assert_eq!(checklist.len(), 1);
    assert_eq!(checklist[0].text, "first");
    assert!(!checklist[0].done);
    assert_eq!(checklist[0].source, StepSource::User);
}

#[test]
fn toggle_step_keeps_order_and_rejects_out_of_range() {
    let mut store = TaskStore::new();
    let id = store.add_at("x", 0).unwrap();
    for text in ["a", "b", "c"] {
        store.add_step(&id, text);
    }

    assert!(store.toggle_step(&id, 1));
    assert!(!store.toggle_step(&id, 3));

    let checklist = store.get(&id).unwrap().checklist();
    let texts: Vec<_> = checklist.iter().map(|step| step.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
    let done: Vec<_> = checklist.iter().map(|step| step.done).collect();
    assert_eq!(done, vec![false, true, false]);
}

#[test]
fn remove_step_shifts_later_steps_left() {
    let mut store = TaskStore::new();
    let id = store.add_at("x", 0).unwrap();
    for text in ["a", "b", "c", "d"] {
        store.add_step(&id, text);
    }

    assert!(store.remove_step(&id, 1));
    assert!(!store.remove_step(&id, 3));

    let texts: Vec<_> = store
        .get(&id)
        .unwrap()
        .checklist()
        .iter()
        .map(|step| step.text.clone())
        .collect();
    assert_eq!(texts, vec!["a", "c", "d"]);
}

#[test]
fn set_memo_is_verbatim() {
    let mut store = TaskStore::new();
    let id = store.add_at("x", 0).unwrap();

    assert!(store.set_memo(&id, "\n  line one\nline two  \n"));
    assert_eq!(store.get(&id).unwrap().memo(), "\n  line one\nline two  \n");
    assert!(!store.set_memo(&TaskId::from("missing"), "ignored"));
}

#[test]
fn completing_a_task_moves_it_to_done_view() {
    let mut store = TaskStore::new();
    let id = store.add("영어 공부").unwrap();

    assert_eq!(store.toggle_done(&id), ToggleOutcome::Completed);

    assert_eq!(ids(&store.filtered(TaskFilter::Done)), vec![id]);
    assert!(store.filtered(TaskFilter::Active(Category::Short)).is_empty());
}
