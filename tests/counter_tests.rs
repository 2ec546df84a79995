use drillbook::counter::{count_matching, count_occurrences, count_occurrences_par, tally_sorted};
use drillbook::{Record, Value};

#[test]
fn test_count_numbers() {
    let values = [1, 2, 3, 4, 1, 1, 3, 1, 5];
    assert_eq!(count_occurrences(&values, &1), 4);
    assert_eq!(count_occurrences(&values, &5), 1);
    assert_eq!(count_occurrences(&values, &6), 0);
}

#[test]
fn test_count_loose_values_by_kind() {
    let values = vec![Value::Int(1), Value::Real(1.0), Value::from("1"), Value::Int(1)];
    assert_eq!(count_occurrences(&values, &Value::Int(1)), 2);
    assert_eq!(count_occurrences(&values, &Value::from("1")), 1);
}

#[test]
fn test_count_records_by_value() {
    let records = vec![
        Record::new(1, "Ada"),
        Record::new(1, "Ada"),
        Record::new(2, "Ada"),
    ];
    assert_eq!(count_occurrences(&records, &Record::new(1, "Ada")), 2);
    assert_eq!(count_matching(&records, |r| r.name == "Ada"), 3);
}

#[test]
fn test_parallel_count_on_large_input() {
    let values: Vec<u32> = (0..100_000).map(|n| n % 7).collect();
    assert_eq!(
        count_occurrences_par(&values, &3),
        count_occurrences(&values, &3)
    );
}

#[test]
fn test_tally_sorted_ties_by_key() {
    let words = ["pear", "fig", "pear", "apple", "fig"];
    assert_eq!(
        tally_sorted(&words),
        vec![("fig", 2), ("pear", 2), ("apple", 1)]
    );
}
