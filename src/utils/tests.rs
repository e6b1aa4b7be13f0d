use crate::utils::*;

use color_eyre::eyre::{Report, Result};

#[test]
fn clone_numbers() -> Result<(), Report> {
    assert_eq!(clone_number("123"), "123");
    assert_eq!(clone_number("IgTree_5_clone"), "5");
    assert_eq!(clone_number("no_digits"), "no_digits");
    assert_eq!(clone_number(""), "");
    Ok(())
}

#[test]
fn sample_without_replacement() -> Result<(), Report> {
    let items: Vec<usize> = (0..50).collect();

    let sampled = sample(items.clone(), 10);
    assert_eq!(sampled.len(), 10);
    // original order, no duplicates
    assert!(sampled.windows(2).all(|w| w[0] < w[1]));

    assert_eq!(sample(items.clone(), 50), items);
    assert_eq!(sample(items.clone(), 80), items);
    assert!(sample(items, 0).is_empty());
    Ok(())
}

#[test]
fn describe_statistics() -> Result<(), Report> {
    let stats = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_eq!(stats[0], Some(8.0));
    assert_eq!(stats[1], Some(5.0));
    let std = stats[2].unwrap_or_default();
    assert!((std - 2.138).abs() < 1e-3);
    assert_eq!(stats[3], Some(2.0));
    assert_eq!(stats[5], Some(4.5));
    assert_eq!(stats[7], Some(9.0));

    let single = describe(&[3.0]);
    assert_eq!(single[1], Some(3.0));
    assert_eq!(single[2], None);
    assert_eq!(single[6], Some(3.0));
    Ok(())
}

#[test]
fn create_nested_dir() -> Result<(), Report> {
    let tmp = tempfile::tempdir()?;
    let dir = tmp.path().join("a").join("b");
    assert_eq!(create_dir(&dir)?, dir);
    assert!(dir.is_dir());
    // already exists
    create_dir(&dir)?;
    Ok(())
}
