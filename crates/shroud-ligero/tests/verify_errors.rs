//! Structural rejection paths of the verifier, separate from the tamper
//! suite: malformed proofs must fail with dimension errors before any
//! algebra runs.

mod common;

use common::{encrypt_columns, setup};
use shroud_fhe::FheBackend;
use shroud_ligero::testing::random_matrix;
use shroud_ligero::{LigeroError, Proof};
use shroud_math::DensePoly;
use shroud_transcript::Transcript;

fn proven() -> (common::TestContext, Proof, shroud_math::F, shroud_math::F) {
    let ctx = setup(2.0, 8, 4, 2, 8, 65537);
    let field = ctx.backend.field();
    let z = field.element(3);

    let (matrix, columns) = random_matrix(8, 4, field, 21);
    let value = DensePoly::from_matrix(&matrix).evaluate(field, z);

    let cts = encrypt_columns(&ctx.backend, &columns);
    let (prover, _) = ctx.committer.commit(cts, &ctx.backend).unwrap();
    let mut transcript = Transcript::new(b"errors");
    let encrypted = prover.prove(z, &ctx.backend, &mut transcript).unwrap();
    let proof = encrypted.decrypt(&ctx.backend, None).unwrap();
    (ctx, proof, z, value)
}

#[test]
fn truncated_combination_vector_is_rejected() {
    let (ctx, mut proof, z, value) = proven();
    proof.mat_r.truncate(2);
    let mut verifier = Transcript::new(b"errors");
    let err = proof
        .verify(z, value, ctx.backend.field(), &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Dimension(_)), "got {err}");
}

#[test]
fn missing_query_is_rejected() {
    let (ctx, mut proof, z, value) = proven();
    proof.queried_cols.pop();
    let mut verifier = Transcript::new(b"errors");
    let err = proof
        .verify(z, value, ctx.backend.field(), &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Dimension(_)), "got {err}");
}

#[test]
fn short_queried_column_is_rejected() {
    let (ctx, mut proof, z, value) = proven();
    proof.queried_cols[0].values.truncate(4);
    let mut verifier = Transcript::new(b"errors");
    let err = proof
        .verify(z, value, ctx.backend.field(), &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Dimension(_)), "got {err}");
}

#[test]
fn metadata_rewrite_is_rejected() {
    let (ctx, mut proof, z, value) = proven();
    proof.metadata.rows = 12; // not a power of two
    let mut verifier = Transcript::new(b"errors");
    let err = proof
        .verify(z, value, ctx.backend.field(), &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Dimension(_)), "got {err}");
}

#[test]
fn mismatched_verifier_transcript_fails() {
    // A verifier that ran a different transcript label derives different
    // challenges, so some check must fail.
    let (ctx, proof, z, value) = proven();
    let mut verifier = Transcript::new(b"other-label");
    let err = proof
        .verify(z, value, ctx.backend.field(), &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Verify(_)), "got {err}");
}

#[test]
fn wrong_point_fails() {
    let (ctx, proof, _, value) = proven();
    let field = ctx.backend.field();
    let mut verifier = Transcript::new(b"errors");
    let err = proof
        .verify(field.element(4), value, field, &mut verifier)
        .unwrap_err();
    assert!(matches!(err, LigeroError::Verify(_)), "got {err}");
}
