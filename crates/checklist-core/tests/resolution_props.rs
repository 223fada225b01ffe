//! Property tests for matching and progress
//!
//! Invariants that must hold for any slot table and any document set.

use checklist_core::prelude::*;
use checklist_core::{progress, resolve, statuses};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = DocumentStatus> {
    prop_oneof![
        Just(DocumentStatus::Pending),
        Just(DocumentStatus::Approved),
        Just(DocumentStatus::Rejected),
        "[A-Z ]{1,8}".prop_map(DocumentStatus::Other),
    ]
}

/// Slots with distinct, non-overlapping labels `Doc-<n>|`
fn slots_strategy() -> impl Strategy<Value = Vec<Slot>> {
    prop::collection::vec(0u8..=100, 1..12).prop_map(|weights| {
        weights
            .into_iter()
            .enumerate()
            .map(|(i, w)| Slot::new(format!("slot{i}"), format!("Doc-{i}|"), w))
            .collect()
    })
}

fn documents_strategy(max_slot: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(
        (0..max_slot + 3, status_strategy(), "[a-z]{0,4}"),
        0..20,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (target, status, noise))| {
                Document::new(
                    format!("doc{i}"),
                    format!("{noise}Doc-{target}|.pdf"),
                    status,
                    format!("cv{i}"),
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn progress_is_bounded_by_weight_sum(
        (slots, docs) in slots_strategy().prop_flat_map(|s| {
            let n = s.len();
            (Just(s), documents_strategy(n))
        })
    ) {
        let bindings = resolve(&docs, &slots);
        let p = progress(&statuses(&bindings), &slots);
        let sum: u32 = slots.iter().map(|s| u32::from(s.weight)).sum();

        prop_assert!(u32::from(p.percentage) <= sum.min(100));
    }

    #[test]
    fn binding_is_first_matching_document(
        (slots, docs) in slots_strategy().prop_flat_map(|s| {
            let n = s.len();
            (Just(s), documents_strategy(n))
        })
    ) {
        let bindings = resolve(&docs, &slots);
        for slot in &slots {
            let expected = docs.iter().find(|d| d.title.contains(&slot.match_text));
            prop_assert_eq!(bindings.get(&slot.key), expected);
        }
    }

    #[test]
    fn all_approved_reaches_weight_sum(slots in slots_strategy()) {
        let docs: Vec<Document> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| Document::new(format!("d{i}"), format!("{}.pdf", s.label), DocumentStatus::Approved, format!("cv{i}")))
            .collect();

        let p = progress(&statuses(&resolve(&docs, &slots)), &slots);
        let sum: u32 = slots.iter().map(|s| u32::from(s.weight)).sum();
        prop_assert_eq!(u32::from(p.percentage), sum.min(100));
    }
}

#[test]
fn empty_store_resolves_every_slot_to_no_file() {
    let checklist = DefinitionValidator::default()
        .validate(checklist_core::variants::full_cycle())
        .unwrap();
    let state = ChecklistState::compute(&checklist, &[]);

    assert_eq!(state.percentage(), 0);
    assert!(state.slot_statuses().values().all(|s| *s == DocumentStatus::NoFile));
}

#[test]
fn one_approved_document_per_slot_completes_checklist() {
    let checklist = DefinitionValidator::default()
        .validate(checklist_core::variants::full_cycle())
        .unwrap();
    let docs: Vec<Document> = checklist
        .slots
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Document::new(
                format!("d{i}"),
                format!("{}.pdf", s.label),
                DocumentStatus::Approved,
                format!("cv{i}"),
            )
        })
        .collect();

    let state = ChecklistState::compute(&checklist, &docs);
    assert_eq!(state.percentage(), 100);
    assert_eq!(state.progress.hint.as_str(), "complete");
}

#[test]
fn recompute_is_idempotent() {
    let checklist = DefinitionValidator::default()
        .validate(checklist_core::variants::physician())
        .unwrap();
    let docs = vec![
        Document::new("1", "Physician Cv.jpeg", DocumentStatus::Pending, "cv1"),
        Document::new("2", "CRM License_v2.pdf", DocumentStatus::Approved, "cv2"),
    ];

    let first = ChecklistState::compute(&checklist, &docs);
    let second = ChecklistState::compute(&checklist, &docs);
    pretty_assertions::assert_eq!(first, second);
}
