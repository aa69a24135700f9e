use blockpress_engine::editing::{BlockPatch, DocumentStore, Editor, ToolbarAction};
use blockpress_engine::models::{BlockKind, Format, ListItem};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const KINDS: [BlockKind; 4] = [
    BlockKind::Heading,
    BlockKind::Paragraph,
    BlockKind::Image,
    BlockKind::List,
];

fn document(blocks: usize) -> DocumentStore {
    let mut store = DocumentStore::new();
    for i in 0..blocks {
        let kind = KINDS[i % KINDS.len()];
        let defaults = match kind {
            BlockKind::List => BlockPatch::new().list_items(
                (0..5).map(|n| ListItem::new(format!("item {n}"))).collect(),
            ),
            _ => BlockPatch::new().content(format!("block {i}")),
        };
        store.insert(kind, &defaults).unwrap();
    }
    store
}

fn bench_store_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_mutations");
    group.sample_size(20);

    let store = document(500);
    let middle = store.blocks()[250].id;

    group.bench_function("update_middle_block", |b| {
        let mut store = store.clone();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            let patch = BlockPatch::new().content(format!("edit {n}"));
            store.update(black_box(middle), &patch).unwrap();
        });
    });

    group.bench_function("reorder_end_to_start", |b| {
        let mut store = store.clone();
        b.iter(|| {
            store.reorder(black_box(499), black_box(0)).unwrap();
        });
    });

    group.finish();
}

fn bench_editor(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor");
    group.sample_size(20);

    group.bench_function("toggle_list_item_bold", |b| {
        let mut editor = Editor::default();
        let list = editor
            .add_block(
                BlockKind::List,
                &BlockPatch::new().list_items((0..50).map(|n| ListItem::new(n.to_string())).collect()),
            )
            .unwrap();
        editor.focus_list_item(list.id, 25).unwrap();
        let action = ToolbarAction::ToggleFormat(Format::Bold);
        b.iter(|| {
            editor.apply_toolbar(black_box(&action)).unwrap();
        });
    });

    group.bench_function("save_500_blocks", |b| {
        let store = document(500);
        b.iter(|| {
            let json = blockpress_engine::io::save_blocks(store.blocks()).unwrap();
            black_box(json);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_store_mutations, bench_editor);
criterion_main!(benches);
