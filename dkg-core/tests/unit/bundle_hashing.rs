use crate::fixtures::{deal_bundle, justification_bundle, response_bundle};
use dkg_core::domain::Packet;
use sha2::{Digest, Sha256};

#[test]
fn deal_hash_is_invariant_under_permutation() {
    let mut sorted = deal_bundle(0, &[0, 1, 2]);
    let mut shuffled = deal_bundle(0, &[2, 0, 1]);
    assert_eq!(sorted.hash(), shuffled.hash());
    // Sorting is observable: the shuffled bundle is now in canonical order.
    assert_eq!(sorted, shuffled);
}

#[test]
fn deal_hash_matches_canonical_layout() {
    let mut bundle = deal_bundle(5, &[1, 0]);
    let hash = bundle.hash();

    let mut hasher = Sha256::new();
    hasher.update(5u32.to_be_bytes());
    for coeff in &bundle.public {
        hasher.update(coeff.serialize());
    }
    for deal in &bundle.deals {
        hasher.update(deal.share_index.to_be_bytes());
        hasher.update(&deal.encrypted_share);
    }
    let expected: [u8; 32] = hasher.finalize().into();
    assert_eq!(hash, expected);
    assert!(bundle.deals.windows(2).all(|w| w[0].share_index < w[1].share_index));
}

#[test]
fn response_hash_is_invariant_under_permutation() {
    let mut a = response_bundle(2, &[(0, true), (1, false), (2, true)]);
    let mut b = response_bundle(2, &[(2, true), (0, true), (1, false)]);
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn response_status_bytes_are_part_of_the_digest() {
    let mut accept = response_bundle(1, &[(0, true)]);
    let mut complain = response_bundle(1, &[(0, false)]);
    assert_ne!(accept.hash(), complain.hash());

    let mut hasher = Sha256::new();
    hasher.update(1u32.to_be_bytes());
    hasher.update(0u32.to_be_bytes());
    hasher.update([0x01]);
    let expected: [u8; 32] = hasher.finalize().into();
    assert_eq!(accept.hash(), expected);
}

#[test]
fn justification_hash_is_invariant_under_permutation() {
    let mut a = justification_bundle(1, &[0, 2]);
    let mut b = justification_bundle(1, &[2, 0]);
    assert_eq!(a.hash(), b.hash());
    assert_eq!(a, b);
}

#[test]
fn justification_hash_covers_the_raw_share_bytes() {
    let mut bundle = justification_bundle(3, &[2]);
    let hash = bundle.hash();

    let mut hasher = Sha256::new();
    hasher.update(3u32.to_be_bytes());
    hasher.update(2u32.to_be_bytes());
    hasher.update(bundle.justifications[0].share.secret_bytes());
    let expected: [u8; 32] = hasher.finalize().into();
    assert_eq!(hash, expected);
}

#[test]
fn hashes_differ_across_senders() {
    let mut a = deal_bundle(0, &[0, 1]);
    let mut b = deal_bundle(1, &[0, 1]);
    assert_ne!(a.hash(), b.hash());
}

#[test]
fn response_bundle_display_lists_verdicts() {
    let bundle = response_bundle(2, &[(0, true), (1, false)]);
    assert_eq!(bundle.to_string(), "share holder 2: [{dealer 0, status true},{dealer 1, status false}]");
}
