use crate::fixtures::{keypair, node};
use dkg_core::domain::{DistKeyShare, DkgOutput, PriShare};

fn output(holder: u32, commit_seeds: &[u8]) -> DkgOutput {
    let (value, _) = keypair(holder as u8 + 0x20);
    DkgOutput {
        qual: (0..3).map(node).collect(),
        key: DistKeyShare {
            commits: commit_seeds.iter().map(|&seed| keypair(seed).1).collect(),
            share: PriShare { index: holder, value },
        },
    }
}

#[test]
fn public_equal_ignores_the_private_share() {
    let a = output(0, &[9, 8]);
    let b = output(1, &[9, 8]);
    assert!(a.public_equal(&b));
}

#[test]
fn public_equal_detects_diverging_commitments() {
    let a = output(0, &[9, 8]);
    let b = output(0, &[9, 7]);
    assert!(!a.public_equal(&b));
}

#[test]
fn group_key_is_the_first_commitment() {
    let share = output(0, &[9, 8]).key;
    assert_eq!(share.public_key(), &share.commits[0]);
    assert_eq!(share.commitments().len(), 2);
    assert_eq!(share.pri_share().index, 0);
}
