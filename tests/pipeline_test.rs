//! End-to-end chart generation tests.
//!
//! Each test writes a CSV into a temporary directory, runs the pipeline and
//! inspects the files it leaves behind.
//!
//! Run: cargo test --test pipeline_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use dbbench_viz::chart::{select_chart, ChartKind, XDimension};
use dbbench_viz::config::{Config, FailurePolicy};
use dbbench_viz::group::{enumerate, GroupingMode};
use dbbench_viz::pipeline::Pipeline;
use dbbench_viz::record::load_records;
use dbbench_viz::scale::AxisScale;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Operation,Database,ElapsedUs,EntityType,EntityCount,Date,Scale";

fn write_csv(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("metrics.csv");
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    fs::write(&path, body).unwrap();
    path
}

fn config(input: PathBuf, output: &Path, mode: GroupingMode) -> Config {
    Config {
        input_path: input,
        output_dir: output.to_path_buf(),
        grouping_mode: mode,
        dpi: 50,
        ..Config::default()
    }
}

fn png_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

fn sample_rows() -> Vec<&'static str> {
    vec![
        "AddManyAsync,PostgreSQL,12000,Athlete,100,2024-05-01,1",
        "AddManyAsync,MongoDB,9000,Athlete,100,2024-05-01,1",
        "AddManyAsync,PostgreSQL,98000,Athlete,1000,2024-05-01,10",
        "AddManyAsync,MongoDB,71000,Athlete,1000,2024-05-01,10",
        "AddManyAsync,PostgreSQL,5000,Team,10,2024-05-01,1",
        "GetByIdAsync,PostgreSQL,300,Athlete,1,2024-05-01,1",
        "GetByIdAsync,PostgreSQL,420,Athlete,1,2024-05-01,1",
        "GetByIdAsync,MongoDB,250,Athlete,1,2024-05-01,1",
        "GetByIdAsync,MongoDB,260,Team,1,2024-05-01,10",
        "DeleteAllAsync,PostgreSQL,150,Athlete,100,2024-05-01,1",
        "DeleteAllAsync,MongoDB,350000,Athlete,1000,2024-05-01,10",
        "AddAsync,PostgreSQL,500,Athlete,1,2024-05-01,1",
    ]
}

#[test]
fn global_mode_writes_one_chart_per_classified_operation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("charts");
    let input = write_csv(dir.path(), &sample_rows());

    let report = Pipeline::new(config(input, &out, GroupingMode::Global))
        .unwrap()
        .run()
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.skipped_operations, vec!["AddAsync"]);
    assert_eq!(
        png_files(&out),
        vec![
            "AddManyAsync_all_entities.png",
            "DeleteAllAsync_all_entities.png",
            "GetByIdAsync_all_entities.png",
        ]
    );
}

#[test]
fn per_entity_mode_writes_one_chart_per_entity_and_operation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("charts");
    let input = write_csv(dir.path(), &sample_rows());

    let report = Pipeline::new(config(input, &out, GroupingMode::PerEntity))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.written.len(), 5);
    assert_eq!(
        png_files(&out),
        vec![
            "Athlete_AddManyAsync.png",
            "Athlete_DeleteAllAsync.png",
            "Athlete_GetByIdAsync.png",
            "Team_AddManyAsync.png",
            "Team_GetByIdAsync.png",
        ]
    );
}

#[test]
fn both_mode_never_collides() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &sample_rows());

    let report = Pipeline::new(config(input, dir.path(), GroupingMode::Both))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.written.len(), 8);
    assert_eq!(png_files(dir.path()).len(), 8);
}

#[test]
fn get_by_id_scenario_gives_two_boxes() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(
        dir.path(),
        &[
            "get-by-id,A,2000,Item,1,2024-05-01,1",
            "get-by-id,B,3000,Item,1,2024-05-01,1",
        ],
    );
    let records = load_records(&input).unwrap();
    let group = enumerate(&records, GroupingMode::Global).next().unwrap();
    let spec = select_chart(&group).unwrap();

    let ChartKind::Distribution { categories, boxes, .. } = spec.kind else {
        panic!("get-by-id must be a distribution chart");
    };
    assert_eq!(categories, vec![1.0]);
    let summary: Vec<(&str, f32)> = boxes.iter().map(|b| (b.database.as_str(), b.values_ms[0])).collect();
    assert_eq!(summary, vec![("A", 2.0), ("B", 3.0)]);

    let out = dir.path().join("out");
    let report = Pipeline::new(config(input, &out, GroupingMode::Global))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(png_files(&out), vec!["get-by-id_all_entities.png"]);
    assert_eq!(report.written.len(), 1);
}

#[test]
fn unclassified_only_input_succeeds_with_no_charts() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let input = write_csv(dir.path(), &["ping,A,10,Item,1,2024-05-01,1"]);

    let report = Pipeline::new(config(input, &out, GroupingMode::Both))
        .unwrap()
        .run()
        .unwrap();

    assert!(report.is_success());
    assert!(report.written.is_empty());
    assert_eq!(report.skipped_operations, vec!["ping"]);
    assert!(!out.exists() || png_files(&out).is_empty());
}

#[test]
fn header_only_input_is_vacuous_success() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &[]);

    let report = Pipeline::new(config(input, dir.path(), GroupingMode::PerEntity))
        .unwrap()
        .run()
        .unwrap();

    assert!(report.is_success());
    assert!(report.written.is_empty());
    assert!(png_files(dir.path()).is_empty());
}

#[test]
fn missing_column_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("metrics.csv");
    fs::write(&input, "Operation,Database,EntityType,Scale,EntityCount\nGetAllAsync,A,T,1,1\n").unwrap();

    let err = Pipeline::new(config(input, dir.path(), GroupingMode::Global))
        .unwrap()
        .run()
        .unwrap_err();
    assert!(err.is_data_load());
}

#[test]
fn log_axis_only_for_delete_all_in_both_modes() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &sample_rows());
    let records = load_records(&input).unwrap();

    for group in enumerate(&records, GroupingMode::Both) {
        let spec = select_chart(&group).unwrap();
        let expected = if group.key.operation == "DeleteAllAsync" {
            AxisScale::Log
        } else {
            AxisScale::Linear
        };
        assert_eq!(spec.y_scale, expected, "{}", group.key);
    }
}

#[test]
fn batch_x_dimension_differs_between_modes() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &sample_rows());
    let records = load_records(&input).unwrap();

    let dimension = |mode| {
        let group = enumerate(&records, mode)
            .find(|g| g.key.operation == "AddManyAsync")
            .unwrap();
        match select_chart(&group).unwrap().kind {
            ChartKind::Trend { x_dimension, series } => {
                let xs: Vec<f64> = series[0].points.iter().map(|p| p.x).collect();
                (x_dimension, xs)
            }
            ChartKind::Distribution { .. } => panic!("AddManyAsync must be a trend chart"),
        }
    };

    assert_eq!(dimension(GroupingMode::Global), (XDimension::Scale, vec![1.0, 10.0]));
    assert_eq!(dimension(GroupingMode::PerEntity), (XDimension::EntityCount, vec![100.0, 1000.0]));
}

#[test]
fn charts_carry_configured_size_and_dpi() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &sample_rows());
    let report = Pipeline::new(Config {
        figure_width: 8.0,
        figure_height: 5.0,
        ..config(input, dir.path(), GroupingMode::Global)
    })
    .unwrap()
    .run()
    .unwrap();

    let file = fs::File::open(&report.written[0]).unwrap();
    let reader = png::Decoder::new(std::io::BufReader::new(file)).read_info().unwrap();
    let info = reader.info();
    assert_eq!((info.width, info.height), (400, 250));
    assert_eq!(info.pixel_dims.unwrap().xppu, 1969);
}

#[test]
fn very_long_database_name_still_charts() {
    let dir = TempDir::new().unwrap();
    let long_name = "ReplicatedClusterStorageEngine".repeat(5);
    let rows = [
        format!("GetAllAsync,{long_name},1200,Athlete,100,2024-05-01,1"),
        format!("GetAllAsync,{long_name},5400,Athlete,1000,2024-05-01,10"),
        format!("GetByIdAsync,{long_name},300,Athlete,1,2024-05-01,1"),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = write_csv(dir.path(), &rows);

    let report = Pipeline::new(config(input, dir.path(), GroupingMode::Global))
        .unwrap()
        .run()
        .unwrap();

    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.written.len(), 2);
}

#[test]
fn same_file_name_from_two_entity_types_is_reported() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let input = write_csv(
        dir.path(),
        &[
            "UpdateAsync,A,100,Team/B,1,2024-05-01,1",
            "UpdateAsync,A,200,Team_B,1,2024-05-01,1",
        ],
    );

    let report = Pipeline::new(config(input, &out, GroupingMode::PerEntity))
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(png_files(&out), vec!["Team_B_UpdateAsync.png"]);
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].key.to_string(), "Team_B/UpdateAsync");
}

#[test]
fn unwritable_output_is_reported_per_group() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(dir.path(), &sample_rows());
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"x").unwrap();

    let report = Pipeline::new(config(input.clone(), &blocker, GroupingMode::Global))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.failures.len(), 3);
    assert!(report.written.is_empty());

    let aborted = Pipeline::new(Config {
        failure_policy: FailurePolicy::Abort,
        ..config(input, &blocker, GroupingMode::Global)
    })
    .unwrap()
    .run();
    assert!(aborted.is_err());
}
