use crate::codon::{translate, Substitution, STOP};

use color_eyre::eyre::{Report, Result};
use itertools::Itertools;

#[test]
fn all_64_codons_translate() -> Result<(), Report> {
    let bases = [b'A', b'C', b'G', b'T'];
    let codons = bases
        .iter()
        .cartesian_product(bases.iter())
        .cartesian_product(bases.iter())
        .map(|((a, b), c)| [*a, *b, *c])
        .collect_vec();
    assert_eq!(codons.len(), 64);

    let translated: Vec<char> = codons.iter().filter_map(|c| translate(c)).collect();
    assert_eq!(translated.len(), 64);
    assert_eq!(translated.iter().filter(|aa| **aa == STOP).count(), 3);
    assert_eq!(translated.iter().filter(|aa| **aa != STOP).unique().count(), 20);
    Ok(())
}

#[test]
fn known_codons() -> Result<(), Report> {
    assert_eq!(translate(b"ATG"), Some('M'));
    assert_eq!(translate(b"ACA"), Some('T'));
    assert_eq!(translate(b"GGC"), Some('G'));
    for stop in [b"TAA", b"TAG", b"TGA"] {
        assert_eq!(translate(stop), Some(STOP));
    }
    Ok(())
}

#[test]
fn unknown_codons() -> Result<(), Report> {
    for codon in [&b"---"[..], b"AN G", b"ANG", b"AC", b"", b"RYA"] {
        assert_eq!(translate(codon), None);
    }
    Ok(())
}

#[test]
fn transition_transversion() -> Result<(), Report> {
    use Substitution::*;
    let expected = [
        (b'A', b'G', Transition),
        (b'G', b'A', Transition),
        (b'C', b'T', Transition),
        (b'T', b'C', Transition),
        (b'A', b'C', Transversion),
        (b'A', b'T', Transversion),
        (b'G', b'C', Transversion),
        (b'G', b'T', Transversion),
    ];
    for (source, dest, substitution) in expected {
        assert_eq!(Substitution::classify(source, dest), Some(substitution));
    }
    assert_eq!(Substitution::classify(b'a', b'g'), Some(Transition));
    assert_eq!(Substitution::classify(b'-', b'G'), None);
    assert_eq!(Transversion.to_string(), "transversion");
    Ok(())
}
