use std::fs;
use std::sync::Arc;

use macroshock::views::{build_heatmap, build_timeline, gauge_summary, HeatmapOptions};
use macroshock::{
    explain_impact, CatalogDocuments, CatalogHandle, Catalogs, IntegrityError, ScenarioEngine,
    ScenarioRunContext,
};

fn write_builtin(dir: &std::path::Path, with_relationships: bool) {
    let docs = CatalogDocuments::builtin();
    fs::write(dir.join("indicators.json"), docs.indicators).unwrap();
    fs::write(dir.join("mechanisms.json"), docs.mechanisms).unwrap();
    fs::write(dir.join("rules.json"), docs.rules).unwrap();
    fs::write(dir.join("scenarios.json"), docs.scenarios).unwrap();
    if with_relationships {
        fs::write(dir.join("relationships.json"), docs.relationships.unwrap()).unwrap();
    }
}

#[test]
fn load_dir_matches_builtin() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin(dir.path(), true);

    let loaded = Catalogs::load_dir(dir.path()).unwrap();
    let builtin = Catalogs::builtin().unwrap();
    assert_eq!(loaded.fingerprint().unwrap(), builtin.fingerprint().unwrap());
    assert_eq!(loaded, builtin);
}

#[test]
fn load_dir_without_relationships() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin(dir.path(), false);

    let loaded = Catalogs::load_dir(dir.path()).unwrap();
    assert!(loaded.relationships.is_empty());
    assert_eq!(loaded.presets.len(), 9);
}

#[test]
fn load_dir_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin(dir.path(), true);
    fs::remove_file(dir.path().join("rules.json")).unwrap();

    let err = Catalogs::load_dir(dir.path()).unwrap_err();
    assert!(err.is_catalog());
    assert!(err.to_string().contains("rules.json"));
}

#[test]
fn load_dir_rejects_dangling_mechanism() {
    let dir = tempfile::tempdir().unwrap();
    write_builtin(dir.path(), true);
    let rules = CatalogDocuments::builtin()
        .rules
        .replacen("\"direct_policy_action\"", "\"mind_control\"", 1);
    fs::write(dir.path().join("rules.json"), rules).unwrap();

    let err = Catalogs::load_dir(dir.path()).unwrap_err();
    assert!(err.is_integrity());
    assert!(err.integrity_defects().iter().any(|d| matches!(
        d,
        IntegrityError::UnknownRuleMechanism { mechanism, .. } if mechanism == "mind_control"
    )));
}

#[test]
fn snapshot_stays_consistent_across_replace() {
    let handle = Arc::new(CatalogHandle::new(Catalogs::builtin().unwrap()));
    let snapshot = handle.snapshot().unwrap();
    let engine = ScenarioEngine::new(Arc::clone(&snapshot));
    let ctx = ScenarioRunContext::builder("fed_cut_dovish_surprise").build();
    let before = engine.run(ctx.clone());

    let writer = {
        let handle = Arc::clone(&handle);
        std::thread::spawn(move || {
            let dir = tempfile::tempdir().unwrap();
            write_builtin(dir.path(), false);
            handle.replace(Catalogs::load_dir(dir.path()).unwrap()).unwrap();
        })
    };
    writer.join().unwrap();

    assert_eq!(engine.run(ctx), before);
    assert_eq!(snapshot.relationships.len(), 24);
    assert!(handle.snapshot().unwrap().relationships.is_empty());
}

#[test]
fn causal_chain_from_shock_node() {
    let catalogs = Catalogs::builtin().unwrap();
    let preset = catalogs.presets.get("fed_hike_hawkish_surprise").unwrap();
    let chain = catalogs
        .relationships
        .downstream(preset.primary_shock_node.as_str());
    assert!(!chain.is_empty());
    assert!(chain.iter().all(|step| step.indicator != &preset.primary_shock_node));
    assert!(chain.windows(2).all(|pair| pair[0].depth <= pair[1].depth));
    assert_eq!(chain[0].depth, 1);
}

#[test]
fn presentation_views_over_builtin_run() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("macroshock=trace"))
        .with_test_writer()
        .try_init();

    let engine = ScenarioEngine::builtin().unwrap();
    let catalogs = engine.catalogs();
    let preset = catalogs.presets.get("core_pce_hotter_than_expected").unwrap();
    let result = engine.run(ScenarioRunContext::for_preset(preset));

    let gauges = gauge_summary(&result);
    let inflation = gauges.iter().find(|g| g.theme == "inflation").unwrap();
    assert!(inflation.score > 0.0);

    let grid = build_heatmap(&catalogs.indicators, Some(&result), &HeatmapOptions::default());
    assert_eq!(grid.active_cells(), result.impacts.len());

    let feed = build_timeline(&catalogs.indicators, &result, None);
    assert_eq!(feed[0].lag, macroshock::LagBucket::Immediate);

    for impact in &result.impacts {
        let explanation = explain_impact(catalogs, preset.id.as_str(), impact);
        assert!(!explanation.mechanism_name.is_empty());
        assert!(!explanation.tooltip.contains('{'));
    }
}
