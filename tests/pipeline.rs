//! End-to-end runs of the coupling analysis on small hand-built SDGs.

use coupling_core::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("coupling_core=debug")
        .try_init();
}

fn mk_vertex(label: &str, kind: VertexKind, loc: &str, line: u32) -> Vertex {
    Vertex::new(label, Some(kind), Some(Location::from(loc)), line)
}

struct Fixture {
    graph: DependenceGraph,
    leak_call: VertexId,
    db_call: VertexId,
    actual_in: VertexId,
    actual_out: VertexId,
}

// svc.Repo.load() line 5 calls io.Stream.open()            <- violation site
//   result flows (DD) into actual-in of a later call
//   summary PS actual-out -> actual-in (builder orientation)
//   actual-out flows (DD) into ui.Page.render() line 20, which calls db.Pool.get()  <- property site
fn fixture() -> Fixture {
    let mut g = DependenceGraph::new();
    let leak_call = g.add_vertex(mk_vertex("open", VertexKind::Call, "svc.Repo.load()", 5));
    let open_entry = g.add_vertex(mk_vertex("open entry", VertexKind::Entr, "io.Stream.open()", 1));
    let actual_in = g.add_vertex(mk_vertex("arg", VertexKind::Acti, "svc.Repo.load()", 6));
    let actual_out = g.add_vertex(mk_vertex("ret", VertexKind::Acto, "svc.Repo.load()", 6));
    let db_call = g.add_vertex(mk_vertex("get", VertexKind::Call, "ui.Page.render()", 20));
    let db_entry = g.add_vertex(mk_vertex("get entry", VertexKind::Entr, "db.Pool.get()", 1));

    g.add_edge(leak_call, open_entry, EdgeKind::Cl).unwrap();
    g.add_edge(db_call, db_entry, EdgeKind::Cl).unwrap();
    g.add_edge(leak_call, actual_in, EdgeKind::Dd).unwrap();
    g.add_edge(actual_out, actual_in, EdgeKind::Ps).unwrap();
    g.add_edge(actual_out, db_call, EdgeKind::Dd).unwrap();
    //noise that must not create a shortcut
    g.add_edge(leak_call, db_call, EdgeKind::Cf).unwrap();
    g.add_edge(leak_call, db_call, EdgeKind::Cd).unwrap();

    Fixture { graph: g, leak_call, db_call, actual_in, actual_out }
}

fn inputs(lines: &[u32]) -> (Vec<ArchitectureProperty>, Vec<PatternViolation>, CompatibilityTable) {
    let properties = vec![
        ArchitectureProperty::call("ui-db", "forbidden-call", LocationPattern::prefix("ui."), LocationPattern::prefix("db.")),
        ArchitectureProperty::structural("layers", "layering"),
    ];
    let violations = vec![PatternViolation::new(
        "unclosed stream",
        "resource-leak",
        LocationPattern::prefix("svc."),
        lines.iter().copied(),
    )];
    let table = CompatibilityTable::new()
        .allow("forbidden-call", "resource-leak")
        .allow("layering", "resource-leak");
    (properties, violations, table)
}

#[test]
fn flipped_summary_edge_carries_violation_to_property() {
    init_tracing();
    let Fixture { mut graph, leak_call, db_call, actual_in, actual_out } = fixture();
    let (mut properties, violations, table) = inputs(&[5]);

    //summary edge still in builder orientation
    assert!(graph.has_edge(actual_out, actual_in, EdgeKind::Ps));

    let report = CouplingAnalysis::default()
        .run(&mut properties, &violations, &mut graph, &table)
        .unwrap();

    assert_eq!(report.violated, vec![PropertyId(0)]);
    assert!(properties[0].is_violated());
    assert!(!properties[1].is_violated(), "structural properties are never violated");
    assert_eq!(report.property_vertices, vec![db_call.index()]);
    assert_eq!(report.violation_vertices, vec![leak_call.index()]);
    assert_eq!(report.reduction, ReductionSummary { removed: 4, flipped: 1, retained: 2 });

    assert!(graph.has_edge(actual_in, actual_out, EdgeKind::Ps));
    assert_eq!(graph.shortest_path(leak_call, db_call), Some(vec![leak_call, actual_in, actual_out, db_call]));
}

#[test]
fn no_flip_means_no_path() {
    let Fixture { mut graph, actual_in, actual_out, .. } = fixture();
    let (mut properties, violations, table) = inputs(&[5]);

    //same orientation but as DD, which the reducer never flips
    let ps = graph
        .edges_of_kind(EdgeKind::Ps)
        .find(|&(_, from, to)| from == actual_out && to == actual_in)
        .map(|(id, _, _)| id)
        .unwrap();
    graph.remove_edge(ps).unwrap();
    graph.add_edge(actual_out, actual_in, EdgeKind::Dd).unwrap();

    let report = CouplingAnalysis::default()
        .run(&mut properties, &violations, &mut graph, &table)
        .unwrap();

    assert!(report.is_clean());
    assert!(properties.iter().all(|p| !p.is_violated()));
}

#[test]
fn violation_on_other_line_is_not_attributed() {
    let Fixture { mut graph, .. } = fixture();
    let (mut properties, violations, table) = inputs(&[99]);

    let report = CouplingAnalysis::default()
        .run(&mut properties, &violations, &mut graph, &table)
        .unwrap();

    assert!(report.violation_vertices.is_empty());
    assert!(report.is_clean());
}

#[test]
fn incompatible_categories_are_not_attributed() {
    let Fixture { mut graph, .. } = fixture();
    let (mut properties, violations, _) = inputs(&[5]);
    let table = CompatibilityTable::new().allow("forbidden-call", "naming");

    let report = CouplingAnalysis::new(AnalysisConfig { cache_reachability: Some(true) })
        .run(&mut properties, &violations, &mut graph, &table)
        .unwrap();

    assert!(report.is_clean());
}

#[test]
fn returned_list_and_flags_agree() {
    let Fixture { mut graph, .. } = fixture();
    let (mut properties, violations, table) = inputs(&[5]);

    let report = CouplingAnalysis::default()
        .run_with_observer(&mut properties, &violations, &mut graph, &table, &NoopObserver)
        .unwrap();

    for (idx, p) in properties.iter().enumerate() {
        assert_eq!(p.is_violated(), report.violated.contains(&PropertyId(idx)), "{}", p.name);
    }
}
