//! The decrypted encrypted proof and the plaintext reference proof must be
//! indistinguishable when both provers are driven by equal transcripts.

mod common;

use common::{encrypt_columns, setup};
use shroud_fhe::FheBackend;
use shroud_ligero::testing::random_matrix;
use shroud_math::DensePoly;
use shroud_transcript::Transcript;

#[test]
fn small_matrix_proofs_are_identical() {
    let ctx = setup(2.0, 8, 4, 2, 8, 65537);
    let field = ctx.backend.field();
    let z = field.element(3);

    let (matrix, columns) = random_matrix(8, 4, field, 1);
    let value = DensePoly::from_matrix(&matrix).evaluate(field, z);

    let cts = encrypt_columns(&ctx.backend, &columns);
    let (prover, _) = ctx.committer.commit(cts, &ctx.backend).unwrap();
    let mut transcript = Transcript::new(b"parity");
    let encrypted = prover.prove(z, &ctx.backend, &mut transcript).unwrap();
    let decrypted = encrypted.decrypt(&ctx.backend, None).unwrap();

    let mut reference_transcript = Transcript::new(b"parity");
    let reference = ctx
        .committer
        .prove_reference(&matrix, z, field, &mut reference_transcript)
        .unwrap();

    // Same root, same challenges, same openings: byte-for-byte equal proofs.
    assert_eq!(decrypted, reference);

    let mut verifier = Transcript::new(b"parity");
    decrypted.verify(z, value, field, &mut verifier).unwrap();
    let mut verifier = Transcript::new(b"parity");
    reference.verify(z, value, field, &mut verifier).unwrap();
}

#[test]
fn production_shape_combinations_agree() {
    // rows=256, cols=128 at rate 1/2.
    let ctx = setup(64.0, 256, 128, 2, 256, 65537);
    let field = ctx.backend.field();
    let z = field.element(71);

    let (matrix, columns) = random_matrix(256, 128, field, 2);

    let cts = encrypt_columns(&ctx.backend, &columns);
    let (prover, _) = ctx.committer.commit(cts, &ctx.backend).unwrap();
    let mut transcript = Transcript::new(b"parity");
    let encrypted = prover.prove(z, &ctx.backend, &mut transcript).unwrap();
    let decrypted = encrypted.decrypt(&ctx.backend, None).unwrap();

    let mut reference_transcript = Transcript::new(b"parity");
    let reference = ctx
        .committer
        .prove_reference(&matrix, z, field, &mut reference_transcript)
        .unwrap();

    assert_eq!(decrypted.mat_r, reference.mat_r);
    assert_eq!(decrypted.mat_z, reference.mat_z);
    assert_eq!(decrypted.root, reference.root);
    for (a, b) in decrypted.queried_cols.iter().zip(&reference.queried_cols) {
        assert_eq!(a.values, b.values);
    }

    let value = DensePoly::from_matrix(&matrix).evaluate(field, z);
    let mut verifier = Transcript::new(b"parity");
    decrypted.verify(z, value, field, &mut verifier).unwrap();
}

#[test]
fn different_transcript_labels_diverge() {
    let ctx = setup(2.0, 8, 4, 2, 8, 65537);
    let field = ctx.backend.field();
    let z = field.element(3);

    let (matrix, _) = random_matrix(8, 4, field, 1);

    let mut a = Transcript::new(b"one");
    let proof_a = ctx.committer.prove_reference(&matrix, z, field, &mut a).unwrap();
    let mut b = Transcript::new(b"two");
    let proof_b = ctx.committer.prove_reference(&matrix, z, field, &mut b).unwrap();

    // Same commitment, different challenges.
    assert_eq!(proof_a.root, proof_b.root);
    assert_ne!(proof_a.mat_r, proof_b.mat_r);
}
