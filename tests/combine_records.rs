use std::path::Path;

use rust_xlsxwriter::Workbook;

use cricket_records::config::PipelineConfig;
use cricket_records::discipline::Discipline;
use cricket_records::error::PipelineError;
use cricket_records::pipeline;
use cricket_records::table::{Cell, Sheet};
use cricket_records::workbook_io::read_workbook;

#[derive(Clone)]
enum Raw {
    Num(f64),
    Str(&'static str),
}
use Raw::{Num, Str};

fn write_raw(path: &Path, header: &[&str], sheets: &[(String, Vec<Vec<Raw>>)]) {
    let mut workbook = Workbook::new();
    for (label, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(label).unwrap();
        for (col, name) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name).unwrap();
        }
        for (row_idx, row) in rows.iter().enumerate() {
            let xl_row = row_idx as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                match value {
                    Num(n) => worksheet.write_number(xl_row, col as u16, *n).unwrap(),
                    Str(s) => worksheet.write_string(xl_row, col as u16, *s).unwrap(),
                };
            }
        }
    }
    workbook.save(path).unwrap();
}

fn batting(player: &'static str, runs: f64, hs: &'static str) -> Vec<Raw> {
    vec![
        Str(player),
        Num(14.0),
        Num(10.0),
        Num(4.0),
        Num(runs),
        Str(hs),
        Num(25.0),
        Num(90.0),
        Num(130.0),
        Num(0.0),
        Num(1.0),
        Num(0.0),
        Num(8.0),
        Num(5.0),
    ]
}

fn bowling(player: &'static str, wkts: f64, bbi: &'static str) -> Vec<Raw> {
    vec![
        Str(player),
        Num(14.0),
        Num(14.0),
        Num(48.0),
        Num(0.0),
        Num(350.0),
        Num(wkts),
        Str(bbi),
        Num(25.0),
        Num(7.3),
        Num(20.0),
        Num(0.0),
        Num(0.0),
    ]
}

/// Jadeja bats in 2012-2014, bowls in 2012-2016 and fields in 2014.
/// Pathirana only bowls, in 2016.
fn seed_inputs(input_dir: &Path) {
    let batting_sheets = (2012..=2014)
        .map(|year| {
            (
                format!("Batting_{year}"),
                vec![batting("RA Jadeja", 100.0, "48*")],
            )
        })
        .collect::<Vec<_>>();
    write_raw(
        &input_dir.join("batting_records.xlsx"),
        &[
            "Player", "Mat", "Inns", "NO", "Runs", "HS", "Ave", "BF", "SR", "100", "50", "0",
            "4s", "6s", "col15",
        ],
        &batting_sheets,
    );

    let figures = ["3/20", "2/10", "3/15", "1/5", "0/12"];
    let bowling_sheets = (2012..=2016)
        .zip(figures)
        .map(|(year, bbi)| {
            let mut rows = vec![bowling("RA Jadeja", 10.0, bbi)];
            if year == 2016 {
                rows.push(bowling("M Pathirana", 19.0, "4/28"));
            }
            (format!("Bowling_{year}"), rows)
        })
        .collect::<Vec<_>>();
    write_raw(
        &input_dir.join("bowling_records.xlsx"),
        &[
            "Player", "Mat", "Inns", "Overs", "Mdns", "Runs", "Wkts", "BBI", "Ave", "Econ", "SR",
            "4", "5", "col14",
        ],
        &bowling_sheets,
    );

    write_raw(
        &input_dir.join("fielding_records.xlsx"),
        &[
            "Player", "Mat", "Inns", "Dis", "Ct", "St", "Ct Wk", "Ct Fi", "MD", "D/I", "col11",
        ],
        &[(
            "Fielding_2014".to_string(),
            vec![vec![
                Str("RA Jadeja"),
                Num(16.0),
                Num(16.0),
                Num(9.0),
                Num(9.0),
                Num(0.0),
                Num(0.0),
                Num(9.0),
                Str("2 (2ct 0st)"),
                Num(0.56),
            ]],
        )],
    );
}

fn config_in(root: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: root.join("raw"),
        output_dir: root.join("final"),
        full_names: None,
    }
}

fn find<'a>(sheets: &'a [Sheet], name: &str) -> &'a Sheet {
    sheets
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("sheet {name} missing"))
}

fn row_of(sheet: &Sheet, player: &str) -> usize {
    (0..sheet.row_count())
        .find(|&row| sheet.cell(row, "Player") == Some(&Cell::text(player)))
        .unwrap_or_else(|| panic!("{player} missing from {}", sheet.name))
}

#[test]
fn full_run_builds_combined_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.input_dir).unwrap();
    seed_inputs(&config.input_dir);

    let names = config.load_names().unwrap();
    let summary = pipeline::run_normalize(&config, &names);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.outcomes.len(), 3);
    assert_eq!(summary.unique_players(), 2);
    let sample: Vec<String> = summary
        .sample()
        .into_iter()
        .map(|(name, id)| format!("{name}: {id}"))
        .collect();
    assert_eq!(sample, ["RA Jadeja: 001", "M Pathirana: 002"]);

    let report = pipeline::run_combine(&config).unwrap();
    assert_eq!(report.players, 2);
    assert_eq!(report.rows("Batting"), Some(1));
    assert_eq!(report.rows("Bowling"), Some(2));
    assert_eq!(report.rows("Fielding"), Some(1));
    assert_eq!(report.rows("Combined"), Some(2));

    let sheets = read_workbook(&config.combined_path()).unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Batting", "Bowling", "Fielding", "Combined"]);

    let combined = find(&sheets, "Combined");
    assert_eq!(
        &combined.header()[..5],
        &["Player_ID", "Player", "Full_Name", "Span_Years", "Seasons_Played"]
    );
    for header in ["Runs", "Runs_bowl", "Mat_bowl", "Mat_field", "BBI", "MD", "MD_Numeric"] {
        assert!(combined.has_column(header), "{header}");
    }

    let jadeja = row_of(combined, "RA Jadeja");
    assert_eq!(combined.cell(jadeja, "Player_ID"), Some(&Cell::text("001")));
    assert_eq!(
        combined.cell(jadeja, "Full_Name"),
        Some(&Cell::text("Ravindrasinh Anirudhsinh Jadeja"))
    );
    assert_eq!(
        combined.cell(jadeja, "Span_Years"),
        Some(&Cell::text("2012-2016"))
    );
    assert_eq!(
        combined.cell(jadeja, "Seasons_Played"),
        Some(&Cell::Number(5.0))
    );
    assert_eq!(combined.cell(jadeja, "Runs"), Some(&Cell::Number(300.0)));
    assert_eq!(
        combined.cell(jadeja, "Runs_bowl"),
        Some(&Cell::Number(1750.0))
    );
    assert_eq!(combined.cell(jadeja, "Wkts"), Some(&Cell::Number(50.0)));
    assert_eq!(combined.cell(jadeja, "BBI"), Some(&Cell::text("3/15")));
    assert_eq!(combined.cell(jadeja, "MD"), Some(&Cell::text("2 (2ct 0st)")));
    assert_eq!(combined.cell(jadeja, "MD_Numeric"), Some(&Cell::Number(2.0)));
    assert_eq!(combined.cell(jadeja, "HS_Numeric"), Some(&Cell::Number(48.0)));

    let pathirana = row_of(combined, "M Pathirana");
    assert_eq!(combined.cell(pathirana, "Player_ID"), Some(&Cell::text("002")));
    assert_eq!(
        combined.cell(pathirana, "Span_Years"),
        Some(&Cell::text("2016"))
    );
    assert_eq!(combined.cell(pathirana, "Wkts"), Some(&Cell::Number(19.0)));
    for numeric in ["Runs", "HS_Numeric", "Ave", "Mat_field", "Ct", "MD_Numeric", "D/I"] {
        assert_eq!(
            combined.cell(pathirana, numeric),
            Some(&Cell::Number(0.0)),
            "{numeric}"
        );
    }
    for text in ["HS", "Not_out_status", "MD"] {
        assert_eq!(
            combined.cell(pathirana, text),
            Some(&Cell::text("-")),
            "{text}"
        );
    }

    let fielding = find(&sheets, "Fielding");
    assert!(fielding.has_column("Mat"));
    assert!(!fielding.has_column("Mat_field"));
    assert_eq!(fielding.cell(0, "Span_Years"), Some(&Cell::text("2012-2016")));
    assert_eq!(fielding.cell(0, "Seasons_Played"), Some(&Cell::Number(1.0)));
}

#[test]
fn missing_source_abandons_one_discipline() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(&config.input_dir).unwrap();
    seed_inputs(&config.input_dir);
    std::fs::remove_file(config.input_path(Discipline::Bowling)).unwrap();

    let names = config.load_names().unwrap();
    let summary = pipeline::run_normalize(&config, &names);
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, Discipline::Bowling);
    assert!(config.cleaned_path(Discipline::Batting).is_file());
    assert!(config.cleaned_path(Discipline::Fielding).is_file());

    let err = pipeline::run_combine(&config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingSource {
            discipline: Discipline::Bowling,
            ..
        }
    ));
    assert!(!config.combined_path().exists());
}
