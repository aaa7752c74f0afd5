// tests/pipeline.rs
//! End-to-end runs: CSV on disk through graph build, both engines and
//! aggregation.

use std::fs;

use anyhow::Result;
use social_graph::generator::generate_message_csv;
use social_graph::record::{load_records, stream_records};
use social_graph::{
    AnalysisConfig, GraphBuilder, Record, Relation, Strategy, analyze, run, vertex_id,
};
use tempfile::TempDir;

fn alice_and_bob() -> Vec<Record> {
    vec![
        Record::new("alice", "hello @bob #spark"),
        Record::new("bob", "hi #spark"),
    ]
}

#[test]
fn alice_bob_spark_scenario() -> Result<()> {
    let (graph, analysis, report) = run(&alice_and_bob(), &AnalysisConfig::default())?;

    let mut names: Vec<_> = graph.vertices().iter().map(|v| v.name.clone()).collect();
    names.sort();
    assert_eq!(names, ["alice", "bob", "spark"]);

    let edges: Vec<_> = graph
        .edges()
        .iter()
        .map(|e| (graph.name(e.src), graph.name(e.dst), e.kind))
        .collect();
    assert_eq!(edges.len(), 3);
    assert!(edges.contains(&(Some("alice"), Some("bob"), Relation::Mention)));
    assert!(edges.contains(&(Some("alice"), Some("spark"), Relation::Hashtag)));
    assert!(edges.contains(&(Some("bob"), Some("spark"), Relation::Hashtag)));

    assert_eq!(report.component_count, 1);
    assert_eq!(report.components[0].size, 3);
    let expected_component = ["alice", "bob", "spark"].map(vertex_id).into_iter().min();
    assert_eq!(Some(report.components[0].component_id), expected_component);

    assert_eq!(report.top_entities[0].name, "spark");
    assert!(analysis.page_rank.converged);
    Ok(())
}

#[test]
fn full_pipeline_is_deterministic() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("corpus.csv");
    generate_message_csv(60, 400, 9, &path)?;
    let (records, _) = load_records(&path)?;

    let config = AnalysisConfig::default();
    let (g1, a1, r1) = run(&records, &config)?;
    let (g2, a2, r2) = run(&records, &config)?;

    assert_eq!(g1.vertices(), g2.vertices());
    assert_eq!(g1.edges(), g2.edges());
    assert_eq!(a1.page_rank.scores, a2.page_rank.scores);
    assert_eq!(a1.components.labels, a2.components.labels);
    assert_eq!(r1.top_entities, r2.top_entities);
    assert_eq!(r1.components, r2.components);
    Ok(())
}

#[test]
fn record_order_does_not_change_the_graph() -> Result<()> {
    let mut records = vec![
        Record::new("a", "@b #x"),
        Record::new("b", "@c"),
        Record::new("c", "#x #y @a"),
        Record::new("d", "#y"),
    ];
    let (forward, _) = GraphBuilder::new().build(&records)?;
    records.reverse();
    let (backward, _) = GraphBuilder::new().build(&records)?;

    assert_eq!(forward.vertices(), backward.vertices());
    assert_eq!(forward.edges(), backward.edges());
    Ok(())
}

#[test]
fn streamed_csv_matches_loaded_csv() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("messages.csv");
    fs::write(
        &path,
        "author,text,timestamp\n\
         alice,\"hello @bob, #spark\",2024-01-01\n\
         ,\"@nobody #orphan\",2024-01-02\n\
         bob,hi #spark,\n\
         carol,,2024-01-03\n",
    )?;

    let (records, load_stats) = load_records(&path)?;
    assert_eq!(load_stats.rows, 4);
    let (loaded, stats) = GraphBuilder::new().build(&records)?;
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.records, 4);

    let (rx, handle) = stream_records(&path, 2)?;
    let (streamed, stream_stats) = GraphBuilder::new().build_stream(rx)?;
    let joined = handle.join().map_err(|_| anyhow::anyhow!("reader panicked"))??;
    assert_eq!(joined.rows, 4);

    assert_eq!(loaded.vertices(), streamed.vertices());
    assert_eq!(loaded.edges(), streamed.edges());
    assert_eq!(stats, stream_stats);
    // carol wrote nothing but is still a vertex.
    assert!(loaded.contains(vertex_id("carol")));
    assert!(!loaded.contains(vertex_id("orphan")));
    Ok(())
}

#[test]
fn config_file_drives_the_run() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("analysis.toml");
    fs::write(&path, "top_k = 1\ngroup_member_limit = 1\ncomponents_strategy = \"union-find\"\n")?;
    let config = AnalysisConfig::load(&path)?;
    assert_eq!(config.components_strategy, Strategy::UnionFind);

    let (_, _, report) = run(&alice_and_bob(), &config)?;
    assert_eq!(report.top_entities.len(), 1);
    assert_eq!(report.components[0].members.len(), 1);
    assert_eq!(report.components[0].size, 3);
    Ok(())
}

#[test]
fn strategies_agree_on_generated_corpus() -> Result<()> {
    let records = social_graph::generator::generate_messages(200, 300, 3);
    let (graph, _) = GraphBuilder::new().build(&records)?;

    let lp = analyze(
        &graph,
        &AnalysisConfig {
            components_strategy: Strategy::LabelPropagation,
            ..AnalysisConfig::default()
        },
    );
    let uf = analyze(
        &graph,
        &AnalysisConfig {
            components_strategy: Strategy::UnionFind,
            ..AnalysisConfig::default()
        },
    );
    assert_eq!(lp.components.labels, uf.components.labels);
    assert_eq!(
        lp.components.component_count,
        petgraph::algo::connected_components(&graph.to_petgraph())
    );
    Ok(())
}
