mod common;

use std::collections::HashSet;

use common::listed_heap;
use insta::assert_snapshot;
use leakscope::retention::{FirstInstance, ShapeGrouped, trace_to_roots};
use leakscope::{
    DotRenderer, EdgeKind, GraphRenderer, HeapSnapshot, MemorySnapshot, ObjectId, ProfilerOptions,
    RetentionPathExtractor, RetentionStrategy, RootKind, TraceError, TraversalLimits,
};

#[test]
fn snapshot_list_retention_graph() {
    let (heap, foos) = listed_heap("Foo", 2);
    let graph = trace_to_roots(&heap, foos[0], TraversalLimits::default()).unwrap();

    assert_snapshot!(DotRenderer.render(&graph), @r##"
digraph retention {
    rankdir=LR;
    node [shape=box, fontname="Arial"];
    edge [fontname="Arial"];
    o0 [label="App\n0x0\nroot: static", style=filled, fillcolor="#ADD8E6"];
    o2 [label="Foo\n0x2", style=filled, fillcolor="#FFB6C1"];
    o1 [label="List\n0x1"];
    o1 -> o2 [label="[0]"];
    o0 -> o1 [label="items"];
}
"##);
}

#[test]
fn snapshot_weakly_held_graph() {
    let mut heap = MemorySnapshot::new();
    let foo = heap.add_object("Foo");
    let table = heap.add_object("WeakTable");
    let widget = heap.add_object("Widget");
    heap.add_root(table, RootKind::Static);
    heap.add_root(widget, RootKind::FinalizerQueue);
    heap.add_reference(table, foo, EdgeKind::Ephemeron).unwrap();
    heap.add_reference(widget, foo, EdgeKind::Field("owner".into()))
        .unwrap();
    heap.add_reference(foo, widget, EdgeKind::Field("child".into()))
        .unwrap();

    let graph = trace_to_roots(&heap, foo, TraversalLimits::default()).unwrap();
    assert!(!graph.is_strongly_rooted());
    assert_eq!(graph.weak_edge_count(), 1);

    assert_snapshot!(DotRenderer.render(&graph), @r##"
digraph retention {
    rankdir=LR;
    node [shape=box, fontname="Arial"];
    edge [fontname="Arial"];
    o1 [label="WeakTable\n0x1\nroot: static", style=filled, fillcolor="#ADD8E6"];
    o2 [label="Widget\n0x2\nroot: finalizer queue", style=filled, fillcolor="#D3D3D3"];
    o0 [label="Foo\n0x0", style=filled, fillcolor="#FFB6C1"];
    o1 -> o0 [label="ephemeron", style=dashed];
    o2 -> o0 [label="owner"];
}
"##);
}

#[test]
fn strong_chain_behind_nearer_weak_root_is_written() {
    // WeakTable (static) -ephemeron-> Foo, one hop; App (static) -> Holder -> Foo, two hops.
    let mut heap = MemorySnapshot::new();
    let foo = heap.add_object("Foo");
    let table = heap.add_object("WeakTable");
    let holder = heap.add_object("Holder");
    let app = heap.add_object("App");
    heap.add_root(table, RootKind::Static);
    heap.add_root(app, RootKind::Static);
    heap.add_reference(table, foo, EdgeKind::Ephemeron).unwrap();
    heap.add_reference(holder, foo, EdgeKind::Field("foo".into()))
        .unwrap();
    heap.add_reference(app, holder, EdgeKind::Field("holder".into()))
        .unwrap();

    let graph = trace_to_roots(&heap, foo, TraversalLimits::default()).unwrap();
    assert!(graph.is_strongly_rooted());

    let dir = tempfile::tempdir().unwrap();
    let extractor =
        RetentionPathExtractor::new(&ProfilerOptions::default().with_output_root(dir.path()));
    let info = heap.try_get_type_info("Foo").unwrap();
    let artifact = extractor.extract_path(&heap, &info, "iter1").unwrap();
    let dot = std::fs::read_to_string(dir.path().join(artifact)).unwrap();

    assert!(dot.contains("o3 -> o2 [label=\"holder\"];"));
    assert!(dot.contains("o2 -> o0 [label=\"foo\"];"));
    assert!(dot.contains("o1 -> o0 [label=\"ephemeron\", style=dashed];"));
}

#[test]
fn finalizable_instance_with_static_owner_is_strongly_rooted() {
    let mut heap = MemorySnapshot::new();
    let foo = heap.add_object("Foo");
    let app = heap.add_object("App");
    heap.add_root(foo, RootKind::FinalizerQueue);
    heap.add_root(app, RootKind::Static);
    heap.add_reference(app, foo, EdgeKind::Field("cache".into()))
        .unwrap();

    let graph = trace_to_roots(&heap, foo, TraversalLimits::default()).unwrap();
    assert!(graph.is_strongly_rooted());
    assert_eq!(graph.edges().len(), 1);
}

#[test]
fn tracing_twice_gives_identical_graphs() {
    let (heap, foos) = listed_heap("Foo", 16);
    let first = trace_to_roots(&heap, foos[5], TraversalLimits::default()).unwrap();
    let second = trace_to_roots(&heap, foos[5], TraversalLimits::default()).unwrap();
    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.edges(), second.edges());
    assert_eq!(DotRenderer.render(&first), DotRenderer.render(&second));
}

#[test]
fn two_object_cycle_terminates_without_revisits() {
    let mut heap = MemorySnapshot::new();
    let a = heap.add_object("A");
    let b = heap.add_object("B");
    heap.add_reference(a, b, EdgeKind::Field("b".into())).unwrap();
    heap.add_reference(b, a, EdgeKind::Field("a".into())).unwrap();

    assert_eq!(
        trace_to_roots(&heap, a, TraversalLimits::default()).unwrap_err(),
        TraceError::Unrooted(a)
    );

    let root = heap.add_object("Root");
    heap.add_root(root, RootKind::Stack);
    heap.add_reference(root, b, EdgeKind::Field("held".into()))
        .unwrap();

    let graph = trace_to_roots(&heap, a, TraversalLimits::default()).unwrap();
    let ids: Vec<ObjectId> = graph.nodes().iter().map(|n| n.id).collect();
    let unique: HashSet<ObjectId> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
    assert_eq!(ids, vec![a, b, root]);
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn long_chain_within_limits() {
    let mut heap = MemorySnapshot::new();
    let foo = heap.add_object("Foo");
    let mut tail = foo;
    for _ in 0..5_000 {
        let node = heap.add_object("Node");
        heap.add_reference(node, tail, EdgeKind::Field("next".into()))
            .unwrap();
        tail = node;
    }
    heap.add_root(tail, RootKind::Static);

    let graph = heap.object_graph(foo, TraversalLimits::default()).unwrap();
    assert_eq!(graph.nodes().len(), 5_001);
    assert!(graph.is_strongly_rooted());
}

#[test]
fn shape_grouping_picks_dominant_retention() {
    let mut heap = MemorySnapshot::new();
    let app = heap.add_object("App");
    let bus = heap.add_object("EventBus");
    heap.add_root(app, RootKind::Static);
    heap.add_root(bus, RootKind::Static);

    let cached = heap.add_object("Foo");
    heap.add_reference(app, cached, EdgeKind::Field("cache".into()))
        .unwrap();
    let mut subscribed = Vec::new();
    for i in 0..3 {
        let foo = heap.add_object("Foo");
        heap.add_reference(bus, foo, EdgeKind::ArrayElement(i)).unwrap();
        subscribed.push(foo);
    }

    let info = heap.try_get_type_info("Foo").unwrap();
    let limits = TraversalLimits::default();
    let first = FirstInstance.select(&heap, &info, limits).unwrap();
    let grouped = ShapeGrouped::new(10).select(&heap, &info, limits).unwrap();

    assert_eq!(first.target(), cached);
    assert_eq!(grouped.target(), subscribed[0]);
}
