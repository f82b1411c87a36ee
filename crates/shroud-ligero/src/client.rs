//! Client-side decryption of an encrypted proof.

use shroud_fhe::{ColumnInstance, DecryptionProver, FheBackend};
use shroud_math::F;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::proof::{EncryptedProof, Proof};
use crate::workers::parallel_map;

impl<B: FheBackend> EncryptedProof<B> {
    /// Decrypts the proof into its clear form.
    ///
    /// The queried columns come out first (they are what the optional
    /// verifiable-decryption prover attests to), then both combination
    /// vectors are decrypted concurrently, one worker pool each.
    #[instrument(level = "debug", skip_all, fields(queries = self.queried_cols.len()))]
    pub fn decrypt(
        &self,
        client: &B,
        decryption_prover: Option<&dyn DecryptionProver>,
    ) -> Result<Proof> {
        let rows = self.metadata.rows;

        let queried_cols = parallel_map(&self.queried_cols, client, |worker, ct| {
            let pt = worker.decrypt(ct)?;
            let mut slots = vec![0u64; rows];
            worker.decode(&pt, &mut slots)?;
            let values = slots.iter().map(|&v| worker.field().element(v)).collect();

            // Keep the exact bytes the Merkle leaf was built from; the
            // verifier re-hashes them.
            let mut ciphertext = Vec::new();
            worker.write_ciphertext(ct, &mut ciphertext)?;
            Ok(ColumnInstance { ciphertext, values })
        })?;
        debug!("queried columns decrypted");

        if let Some(prover) = decryption_prover {
            prover.prove_batched(&queried_cols)?;
            debug!("decryption proof attached");
        }

        let (mat_r, mat_z) = rayon::join(
            || decrypt_combination(&self.mat_r, &client.fork()),
            || decrypt_combination(&self.mat_z, &client.fork()),
        );

        Ok(Proof {
            metadata: self.metadata,
            root: self.root,
            mat_r: mat_r?,
            mat_z: mat_z?,
            queried_cols,
            merkle_paths: self.merkle_paths.clone(),
        })
    }
}

/// Decrypts a combination vector, extracting slot 0 of every ciphertext.
fn decrypt_combination<B: FheBackend>(cts: &[B::Ciphertext], client: &B) -> Result<Vec<F>> {
    parallel_map(cts, client, |worker, ct| {
        let pt = worker.decrypt(ct)?;
        let mut slot = [0u64; 1];
        worker.decode(&pt, &mut slot)?;
        Ok(worker.field().element(slot[0]))
    })
}
