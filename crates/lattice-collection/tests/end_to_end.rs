//! End-to-end tests driving a collection component through the headless host.

#![cfg(feature = "headless")]

use std::sync::Arc;

use lattice_collection::prelude::*;
use lattice_collection::{HostEvent, RecordingSlot};
use lattice_collection_core::State;
use parking_lot::Mutex;

type Labels = CollectionView<u32, String, HeadlessCollection<String>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records every position the cell provider is called with.
#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<Position>>>);

impl CallLog {
    fn take(&self) -> Vec<Position> {
        std::mem::take(&mut *self.0.lock())
    }
}

fn labels(data: &State<Vec<u32>>, calls: &CallLog, selected: &CallLog) -> Labels {
    let reader = data.reader();
    let calls = calls.clone();
    let selected = selected.clone();
    CollectionView::new(
        data,
        move |p: Position| {
            calls.0.lock().push(p);
            reader.with(|v| format!("item {}", v[p.item()]))
        },
        move |p| selected.0.lock().push(p),
    )
}

/// A single-content slot for querying the coordinator directly.
#[derive(Default)]
struct SingleSlot(Vec<String>);

impl ReusableSlot<String> for SingleSlot {
    fn clear(&mut self) {
        self.0.clear();
    }

    fn install(&mut self, content: HostedContent<String>) {
        self.0.push(content.into_content());
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[test]
fn test_default_structure_and_single_provider_call() {
    init_tracing();
    let data = State::new((0..10).collect());
    let calls = CallLog::default();
    let mut host = RepresentableHost::new();
    host.render(labels(&data, &calls, &CallLog::default())).unwrap();

    let coordinator = host.coordinator().unwrap().clone();
    assert_eq!(coordinator.section_count(), 1);
    assert_eq!(coordinator.item_count(0), 10);

    calls.take();
    let mut slot = SingleSlot::default();
    coordinator.content(Position::new(0, 5), &mut slot);
    assert_eq!(calls.take(), vec![Position::new(0, 5)]);
    assert_eq!(slot.0, vec!["item 5".to_string()]);
}

#[test]
fn test_oversized_items_per_section_is_clamped() {
    init_tracing();
    let data = State::new((0..10).collect());
    let mut host = RepresentableHost::new();
    host.render(labels(&data, &CallLog::default(), &CallLog::default()).items_per_section(Some(20)))
        .unwrap();

    assert_eq!(host.coordinator().unwrap().item_count(0), 10);
    let widget = host.widget().unwrap();
    assert_eq!(widget.reported_counts(), &[10]);
    assert!(widget.visible_positions().iter().all(|p| p.item() < 10));
}

#[test]
fn test_header_without_footer_provider() {
    init_tracing();
    let data = State::new((0..10).collect());
    let view = labels(&data, &CallLog::default(), &CallLog::default())
        .with_header(|section| format!("header {section}"))
        .header_size(Size::new(350.0, 35.0))
        .footer_size(Size::new(350.0, 35.0));

    let mut host = RepresentableHost::new();
    host.render(view).unwrap();

    let coordinator = host.coordinator().unwrap();
    assert_eq!(
        coordinator.supplementary_size(SupplementaryKind::Header, 0),
        Size::new(350.0, 35.0)
    );
    assert_eq!(
        coordinator.supplementary_size(SupplementaryKind::Footer, 0),
        Size::new(350.0, 35.0)
    );

    let widget = host.widget().unwrap();
    let header = widget.supplementary(SupplementaryKind::Header, 0).unwrap();
    assert_eq!(header.content().map(String::as_str), Some("header 0"));
    let footer: &RecordingSlot<String> = widget.supplementary(SupplementaryKind::Footer, 0).unwrap();
    assert!(footer.is_empty());
}

#[test]
fn test_append_is_visible_after_update_without_recreation() {
    init_tracing();
    let data = State::new((0..10).collect());
    let calls = CallLog::default();
    let selected = CallLog::default();
    let mut host = RepresentableHost::new();
    host.invalidate_on(&data);
    host.render(labels(&data, &calls, &selected)).unwrap();

    let before = host.coordinator().unwrap().clone();
    let delegate_before = host.widget().unwrap().delegate().unwrap().clone();

    data.update(|v| v.push(10));
    assert!(host.flush().unwrap());

    let after = host.coordinator().unwrap().clone();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(Arc::ptr_eq(
        &delegate_before,
        host.widget().unwrap().delegate().unwrap()
    ));
    assert_eq!(after.item_count(0), 11);

    let widget = host.widget().unwrap();
    assert_eq!(widget.reported_counts(), &[11]);
    assert_eq!(widget.stats().reloads, 1);
    assert_eq!(widget.stats().change_sets, 1);
    assert_eq!(widget.stats().delegates_installed, 1);
    assert!(widget.visible_positions().contains(&Position::new(0, 10)));
}

#[test]
fn test_unchanged_rerender_leaves_widget_alone() {
    init_tracing();
    let data = State::new((0..10).collect());
    let calls = CallLog::default();
    let selected = CallLog::default();
    let view = labels(&data, &calls, &selected);

    let mut host = RepresentableHost::new();
    host.render(view.clone()).unwrap();
    host.widget_mut().unwrap().clear_events();

    // Same providers and data: nothing to apply.
    host.render(view).unwrap();
    let widget = host.widget().unwrap();
    assert!(widget.events().is_empty());
    assert_eq!(widget.stats().change_sets, 0);
    assert_eq!(widget.stats().layout_applications, 1);
}

#[test]
fn test_tap_forwards_selection_once() {
    init_tracing();
    let data = State::new((0..10).collect());
    let selected = CallLog::default();
    let mut host = RepresentableHost::new();
    host.render(labels(&data, &CallLog::default(), &selected)).unwrap();

    let widget = host.widget_mut().unwrap();
    assert!(widget.tap(Position::new(0, 7)));
    assert_eq!(selected.take(), vec![Position::new(0, 7)]);
    assert_eq!(widget.events().last(), Some(&HostEvent::Select(Position::new(0, 7))));
}

#[test]
fn test_scrolling_never_stacks_content() {
    init_tracing();
    let data = State::new((0..500).collect());
    let mut host = RepresentableHost::new();
    host.render(labels(&data, &CallLog::default(), &CallLog::default())).unwrap();

    let widget = host.widget_mut().unwrap();
    for offset in [0.0, 1_000.0, 2_500.0, 300.0, 9_000.0] {
        widget.scroll_to(offset);
        for position in widget.visible_positions() {
            let slot = widget.cell(position).unwrap();
            assert_eq!(slot.installed().len(), 1, "stacked content at {position}");
            assert_eq!(slot.content(), Some(&format!("item {}", position.item())));
        }
    }
    assert!(widget.stats().reused_slots > 0);
}

#[test]
fn test_sections_override_with_toml_preset() {
    init_tracing();
    let preset = LayoutConfiguration::from_toml_str(
        r#"
        scroll_axis = "horizontal"
        section_count = 2
        items_per_section = 3

        [item_size]
        width = 80.0
        height = 60.0

        [header_size]
        width = 20.0
        height = 200.0
        "#,
    )
    .unwrap();

    let data = State::new((0..10).collect());
    let view = labels(&data, &CallLog::default(), &CallLog::default())
        .with_layout(preset)
        .with_header(|section| format!("header {section}"));

    let mut host = RepresentableHost::new();
    host.render(view).unwrap();

    let widget = host.widget().unwrap();
    assert_eq!(widget.reported_counts(), &[3, 3]);
    assert_eq!(widget.layout().unwrap().scroll_axis(), ScrollAxis::Horizontal);
    assert!(widget.supplementary(SupplementaryKind::Header, 1).is_some());
    assert!(widget.events().iter().position(|e| matches!(e, HostEvent::Structure { .. }))
        < widget.events().iter().position(|e| matches!(e, HostEvent::Cell(_))));
}

#[test]
fn test_invalid_preset_is_a_config_error() {
    let err = LayoutConfiguration::from_toml_str("item_size = 3").unwrap_err();
    assert!(matches!(err, CollectionError::Config(_)));
}

#[test]
fn test_unmount_releases_widget_and_coordinator() {
    init_tracing();
    let data = State::new((0..3).collect());
    let mut host = RepresentableHost::new();
    host.invalidate_on(&data);
    host.render(labels(&data, &CallLog::default(), &CallLog::default())).unwrap();

    let coordinator = Arc::downgrade(host.coordinator().unwrap());
    assert!(host.unmount());
    assert!(coordinator.upgrade().is_none());
    assert_eq!(data.changed().connection_count(), 0);
    assert!(matches!(host.flush(), Err(CollectionError::NotMounted)));
}

#[test]
fn test_rerender_repulls_content_after_write() {
    init_tracing();
    let data = State::new((0..10).collect());
    let view = labels(&data, &CallLog::default(), &CallLog::default());
    let mut host = RepresentableHost::new();
    host.render(view.clone()).unwrap();

    data.set(vec![7, 8, 9]);
    host.render(view).unwrap();

    let widget = host.widget().unwrap();
    assert_eq!(widget.reported_counts(), &[3]);
    assert_eq!(
        widget.cell(Position::new(0, 0)).unwrap().content(),
        Some(&"item 7".to_string())
    );
    assert_eq!(
        widget.cell(Position::new(0, 2)).unwrap().content(),
        Some(&"item 9".to_string())
    );
}

#[test]
fn test_truncate_recycles_removed_cells() {
    init_tracing();
    let data = State::new((0..10).collect());
    let mut host = RepresentableHost::new();
    host.invalidate_on(&data);
    host.render(labels(&data, &CallLog::default(), &CallLog::default())).unwrap();
    assert_eq!(host.widget().unwrap().visible_positions().len(), 10);
    assert_eq!(host.widget().unwrap().pooled(ReuseKind::Cell), 0);

    data.update(|v| v.truncate(2));
    assert!(host.flush().unwrap());

    let widget = host.widget().unwrap();
    assert_eq!(
        widget.visible_positions(),
        vec![Position::new(0, 0), Position::new(0, 1)]
    );
    assert_eq!(widget.pooled(ReuseKind::Cell), 8);
    assert_eq!(widget.stats().reloads, 1);
    assert_eq!(widget.stats().change_sets, 1);
    for position in widget.visible_positions() {
        let slot = widget.cell(position).unwrap();
        assert_eq!(slot.installed().len(), 1);
        assert_eq!(slot.content(), Some(&format!("item {}", position.item())));
    }
}
