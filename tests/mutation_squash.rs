mod common;

use common::*;
use firestore_local_rs::model::mutation::{squash, Mutation, MutationSquasher, TouchedFields};
use firestore_local_rs::model::{MutableDocument, Timestamp};

fn write_time() -> Timestamp {
    Timestamp::new(1_700_000_000, 0)
}

/// Applies `mutations` one by one and checks that their squashed form gives
/// the same document when applied to `base`.
fn assert_squash_round_trips(base: &MutableDocument, mutations: &[Mutation]) {
    let mut expected = base.clone();
    let mut touched = TouchedFields::none();
    for mutation in mutations {
        touched = mutation.apply_to_local_view(&mut expected, touched, write_time());
    }

    let squashed = squash(base, mutations, write_time());
    let mut actual = base.clone();
    if let Some(squashed) = &squashed {
        squashed.apply_to_local_view(&mut actual, TouchedFields::none(), write_time());
    }

    assert_eq!(
        actual, expected,
        "squash failed\nbase: {base}\nmutations: {mutations:#?}\nsquashed: {squashed:#?}"
    );
}

/// Every ordering of `items`, built by inserting the first element at each
/// position of the permutations of the rest.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let Some((first, rest)) = items.split_first() else {
        return vec![Vec::new()];
    };
    let mut result = Vec::new();
    for permutation in permutations(rest) {
        for index in 0..=permutation.len() {
            let mut copy = permutation.clone();
            copy.insert(index, first.clone());
            result.push(copy);
        }
    }
    result
}

fn subsets<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    (0..1usize << items.len())
        .map(|bits| {
            items
                .iter()
                .enumerate()
                .filter(|(index, _)| bits & (1 << index) != 0)
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect()
}

fn run_permutation_tests(docs: &[MutableDocument], mutations: &[Mutation]) -> usize {
    let mut cases = 0;
    let orderings = permutations(mutations);
    for doc in docs {
        for ordering in &orderings {
            assert_squash_round_trips(doc, ordering);
            cases += 1;
        }
    }
    cases
}

fn run_subset_permutation_tests(docs: &[MutableDocument], mutations: &[Mutation]) -> usize {
    subsets(mutations)
        .iter()
        .map(|subset| run_permutation_tests(docs, subset))
        .sum()
}

#[test]
fn squash_one_set_mutation() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", string("foo-value")), ("baz", string("baz-value"))]),
        &[set_mutation("collection/key", &[("bar", string("bar-value"))])],
    );
}

#[test]
fn squash_one_patch_mutation() {
    assert_squash_round_trips(
        &doc(
            "collection/key",
            0,
            &[("foo", map(&[("bar", string("bar-value"))])), ("baz", string("baz-value"))],
        ),
        &[patch_mutation("collection/key", &[("foo.bar", string("new-bar-value"))])],
    );
}

#[test]
fn squash_merge_on_deleted_document() {
    let upsert = merge_mutation(
        "collection/key",
        &[("foo.bar", string("new-bar-value"))],
        &["foo.bar"],
    );
    assert_squash_round_trips(&deleted_doc("collection/key", 0), &[upsert]);
}

#[test]
fn squash_delete_then_patch() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            delete_mutation("collection/key"),
            patch_mutation("collection/key", &[("foo.bar", string("new-bar-value"))]),
        ],
    );
}

#[test]
fn squash_delete_then_merge() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            delete_mutation("collection/key"),
            merge_mutation("collection/key", &[("foo.bar", string("new-bar-value"))], &["foo.bar"]),
        ],
    );
}

#[test]
fn squash_patch_then_patch_deleting_field() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", increment(1))],
            ),
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", delete_field())],
            ),
        ],
    );
}

#[test]
fn squash_patch_then_merge() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", increment(1))],
            ),
            merge_mutation("collection/key", &[("arrays", array_union(&[1, 2, 3]))], &["arrays"]),
        ],
    );
}

#[test]
fn squash_array_union_then_remove() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            merge_mutation("collection/key", &[("arrays", array_union(&[1, 2, 3]))], &[]),
            merge_mutation(
                "collection/key",
                &[("foo", string("xxx")), ("arrays", array_remove(&[2]))],
                &["foo"],
            ),
        ],
    );
}

#[test]
fn squash_set_then_increment() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("foo", int(1))]),
        &[
            set_mutation("collection/key", &[("foo", int(2))]),
            patch_mutation("collection/key", &[("foo", increment(2))]),
        ],
    );
}

#[test]
fn squash_set_then_patch_on_deleted_document() {
    assert_squash_round_trips(
        &deleted_doc("collection/key", 0),
        &[
            set_mutation("collection/key", &[("bar", string("bar-value"))]),
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", server_timestamp())],
            ),
        ],
    );
}

#[test]
fn squash_deletion_of_nested_field() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("bar.baz", int(1))]),
        &[
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", increment(1))],
            ),
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", server_timestamp())],
            ),
            patch_mutation(
                "collection/key",
                &[("foo", string("foo-patched-value")), ("bar.baz", delete_field())],
            ),
        ],
    );
}

#[test]
fn squash_recreates_parent_emptied_by_deletes() {
    assert_squash_round_trips(
        &doc("collection/key", 0, &[("a.b", int(1)), ("c", int(3))]),
        &[
            patch_mutation("collection/key", &[("a.b", delete_field())]),
            patch_mutation("collection/key", &[("a.c", int(2))]),
        ],
    );
}

#[test]
fn squasher_matches_free_function() {
    let base = doc("collection/key", 0, &[("foo", int(1))]);
    let mutations = [
        delete_mutation("collection/key"),
        merge_mutation("collection/key", &[("foo.bar", string("new-bar-value"))], &["foo.bar"]),
    ];

    let mut squasher = MutationSquasher::new(&base);
    for mutation in &mutations {
        squasher.squash(mutation, write_time());
    }

    assert_eq!(squasher.mutation(), squash(&base, &mutations, write_time()));
    assert!(squasher.touched_fields().is_all());
}

#[test]
fn squash_with_multiple_deletes() {
    let docs = [
        doc("collection/key", 0, &[("foo", string("foo-value")), ("bar.baz", int(1))]),
        deleted_doc("collection/key", 0),
        unknown_doc("collection/key", 0),
    ];
    let mutations = [
        set_mutation("collection/key", &[("bar", string("bar-value"))]),
        delete_mutation("collection/key"),
        delete_mutation("collection/key"),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value")), ("bar.baz", server_timestamp())],
        ),
    ];

    // 4! orderings for each of the three documents.
    assert_eq!(run_permutation_tests(&docs, &mutations), 72);
}

#[test]
fn squash_every_subset_and_ordering() {
    let docs = [
        doc("collection/key", 0, &[("foo", string("foo-value")), ("bar", int(1))]),
        deleted_doc("collection/key", 0),
        unknown_doc("collection/key", 0),
    ];
    let mutations = [
        set_mutation("collection/key", &[("bar", string("bar-value"))]),
        set_mutation("collection/key", &[("bar.rab", string("bar.rab-value"))]),
        delete_mutation("collection/key"),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-incr")), ("bar", increment(1))],
        ),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-delete")), ("bar", delete_field())],
        ),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-st")), ("bar", server_timestamp())],
        ),
        merge_mutation("collection/key", &[("arrays", array_union(&[1, 2, 3]))], &["arrays"]),
    ];

    // (0! + 7*1! + 21*2! + 35*3! + 35*4! + 21*5! + 7*6! + 7!) * 3
    assert_eq!(run_subset_permutation_tests(&docs, &mutations), 41_100);
}

#[test]
fn squash_every_subset_and_ordering_of_array_transforms() {
    let docs = [
        doc("collection/key", 0, &[("foo", string("foo-value")), ("bar.baz", int(1))]),
        deleted_doc("collection/key", 0),
        unknown_doc("collection/key", 0),
    ];
    let mutations = [
        set_mutation("collection/key", &[("bar", string("bar-value"))]),
        merge_mutation(
            "collection/key",
            &[("foo", string("xxx")), ("arrays", array_remove(&[2]))],
            &["foo"],
        ),
        delete_mutation("collection/key"),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-1")), ("arrays", array_union(&[4, 5]))],
        ),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-2")), ("arrays", array_remove(&[5, 6]))],
        ),
        merge_mutation(
            "collection/key",
            &[("foo", string("yyy")), ("arrays", array_union(&[1, 2, 3, 999]))],
            &["foo"],
        ),
    ];

    // (0! + 6*1! + 15*2! + 20*3! + 15*4! + 6*5! + 6!) * 3
    assert_eq!(run_subset_permutation_tests(&docs, &mutations), 5_871);
}

#[test]
fn squash_every_subset_and_ordering_of_increments() {
    let docs = [
        doc("collection/key", 0, &[("foo", string("foo-value")), ("bar", int(1))]),
        deleted_doc("collection/key", 0),
        unknown_doc("collection/key", 0),
    ];
    let mutations = [
        set_mutation("collection/key", &[("bar", string("bar-value"))]),
        merge_mutation(
            "collection/key",
            &[("foo", string("foo-merge")), ("bar", increment(2))],
            &["foo"],
        ),
        delete_mutation("collection/key"),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-1")), ("bar", increment_double(-1.4))],
        ),
        patch_mutation(
            "collection/key",
            &[("foo", string("foo-patched-value-2")), ("bar", increment_double(3.3))],
        ),
        merge_mutation(
            "collection/key",
            &[("foo", string("yyy")), ("bar", increment(-41))],
            &["foo"],
        ),
    ];

    assert_eq!(run_subset_permutation_tests(&docs, &mutations), 5_871);
}
