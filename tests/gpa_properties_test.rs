use anyhow::Result;
use gpa_calc::domain::model::ColumnLayout;
use gpa_calc::{CalculationRequest, Cell, ExemptionSet, GpaError, GpaSession, GradeScale};

fn row(code: &str, semester: &str, credits: f64, grade: Option<f64>) -> Vec<Cell> {
    vec![
        Cell::text(code),
        Cell::text(semester),
        Cell::Number(credits),
        grade.map(Cell::Number).unwrap_or(Cell::Empty),
    ]
}

fn transcript() -> Vec<Vec<Cell>> {
    vec![
        row("PRF192", "Fall 2022", 3.0, Some(8.0)),
        row("MAE101", "Fall2022", 2.0, Some(6.0)),
        row("PE101", "FA22", 2.0, Some(10.0)),
        row("pe102", "Spring 2022", 2.0, Some(4.0)),
        row("PRO192", "Spring 2023", 3.0, Some(9.0)),
    ]
}

fn session(exemptions: ExemptionSet) -> GpaSession {
    GpaSession::new(ColumnLayout::default(), GradeScale::Ten, exemptions)
}

#[test]
fn test_weighted_mean_of_two_subjects() -> Result<()> {
    let rows = vec![
        row("PRF192", "FA22", 3.0, Some(8.0)),
        row("MAE101", "FA22", 2.0, Some(6.0)),
    ];
    let outcome = session(ExemptionSet::new()).calculate(&rows, &CalculationRequest::Overall)?;

    assert_eq!(outcome.result.rounded(), 7.20);
    assert_eq!(outcome.result.weighted_sum(), 36.0);
    Ok(())
}

#[test]
fn test_each_gradable_record_counts_once() -> Result<()> {
    let outcome = session(ExemptionSet::new()).calculate(&transcript(), &CalculationRequest::Overall)?;

    assert_eq!(outcome.result.subjects_counted(), 5);
    assert_eq!(outcome.result.total_credits(), 12);
    Ok(())
}

#[test]
fn test_equivalent_semester_spellings_give_same_result() -> Result<()> {
    let s = session(ExemptionSet::new());
    let rows = transcript();

    let results: Vec<_> = ["Fall 2022", "Fall2022", "FA22"]
        .iter()
        .map(|label| s.calculate(&rows, &CalculationRequest::semester(*label)))
        .collect::<gpa_calc::Result<_>>()?;

    for outcome in &results {
        assert_eq!(outcome.result, results[0].result);
        assert_eq!(outcome.result.subjects_counted(), 3);
    }

    let spring = s.calculate(&rows, &CalculationRequest::semester("Spring2022"))?;
    assert_eq!(spring.result.subjects_counted(), 1);
    assert_eq!(spring.result.average(), 4.0);
    Ok(())
}

#[test]
fn test_unknown_semester_names_requested_label() {
    let err = session(ExemptionSet::new())
        .calculate(&transcript(), &CalculationRequest::semester("Summer 2024"))
        .unwrap_err();

    match err {
        GpaError::UnknownSemester {
            requested, available, ..
        } => {
            assert_eq!(requested, "Summer 2024");
            assert!(available.contains(&"Fall 2022".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_exemption_prefix_is_case_insensitive() -> Result<()> {
    let s = session(ExemptionSet::from_prefixes(["PE "])?);
    let outcome = s.calculate(&transcript(), &CalculationRequest::Overall)?;

    let exempt: Vec<&str> = outcome
        .excluded
        .iter()
        .map(|e| e.subject_code.as_str())
        .collect();
    assert_eq!(exempt, vec!["PE101", "PE102"]);
    assert_eq!(outcome.result.subjects_counted(), 3);
    Ok(())
}

#[test]
fn test_add_then_remove_exemption_restores_result() -> Result<()> {
    let mut s = session(ExemptionSet::with_defaults());
    let rows = transcript();
    let before = s.calculate(&rows, &CalculationRequest::Overall)?;

    s.add_exemption("PRO")?;
    let during = s.calculate(&rows, &CalculationRequest::Overall)?;
    assert_ne!(during.result, before.result);

    s.remove_exemption("pro");
    let after = s.calculate(&rows, &CalculationRequest::Overall)?;
    assert_eq!(after.result, before.result);
    assert_eq!(after.excluded, before.excluded);
    Ok(())
}

#[test]
fn test_all_exempt_scope_is_not_a_zero_score() -> Result<()> {
    let s = session(ExemptionSet::from_prefixes(["PRF", "MAE", "PE"])?);
    let err = s
        .calculate(&transcript(), &CalculationRequest::semester("FA22"))
        .unwrap_err();

    assert!(matches!(err, GpaError::NoGradableSubjects { .. }));
    Ok(())
}

#[test]
fn test_malformed_credit_row_does_not_stop_later_rows() -> Result<()> {
    let mut rows = transcript();
    rows.insert(
        1,
        vec![Cell::text("CEA201"), Cell::text("FA22"), Cell::text("N/A"), Cell::Number(7.0)],
    );

    let outcome = session(ExemptionSet::new()).calculate(&rows, &CalculationRequest::Overall)?;

    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].row, 2);
    assert_eq!(outcome.result.subjects_counted(), 5);
    Ok(())
}

#[test]
fn test_very_large_credit_values_are_summed_exactly() -> Result<()> {
    let rows = vec![
        row("PRF192", "FA22", 4e9, Some(8.0)),
        row("MAE101", "FA22", 4e9, Some(6.0)),
    ];

    let outcome = session(ExemptionSet::new()).calculate(&rows, &CalculationRequest::Overall)?;

    assert_eq!(outcome.result.total_credits(), 8_000_000_000);
    assert_eq!(outcome.result.rounded(), 7.0);
    Ok(())
}

#[test]
fn test_failed_semester_request_still_lists_bad_rows() {
    let rows = vec![
        vec![Cell::text("PRF192"), Cell::text("Fall 2022"), Cell::text("three"), Cell::Number(8.0)],
        row("MAE101", "Spring 2023", 3.0, Some(6.0)),
    ];

    let err = session(ExemptionSet::new())
        .calculate(&rows, &CalculationRequest::semester("FA22"))
        .unwrap_err();

    assert!(matches!(err, GpaError::UnknownSemester { .. }));
    let message = err.user_friendly_message();
    assert!(message.contains("row 1: invalid credits 'three'"));
}
