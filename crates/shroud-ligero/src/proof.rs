//! Proof containers and the wire format.
//!
//! The frame is little-endian with no padding, in fixed order: metadata,
//! `matR`, `matZ`, the queried columns, the Merkle paths, and finally the
//! root. Ciphertext bytes are the backend's canonical form; the reader
//! allocates each ciphertext at the backend's maximum level before filling
//! it. Path lengths are implied by the metadata, so paths carry no framing of
//! their own.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use shroud_fhe::{BackendError, ColumnInstance, FheBackend};
use shroud_math::F;
use shroud_merkle::{path_depth, Hash, MerklePath};

use crate::committer::LigeroMetadata;
use crate::error::{LigeroError, Result};

/// The proof as the server emits it: everything still encrypted.
pub struct EncryptedProof<B: FheBackend> {
    pub metadata: LigeroMetadata,
    pub root: Hash,
    pub mat_r: Vec<B::Ciphertext>,
    pub mat_z: Vec<B::Ciphertext>,
    pub queried_cols: Vec<B::Ciphertext>,
    pub merkle_paths: Vec<MerklePath>,
}

impl<B: FheBackend> std::fmt::Debug for EncryptedProof<B>
where
    B::Ciphertext: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedProof")
            .field("metadata", &self.metadata)
            .field("root", &self.root)
            .field("mat_r", &self.mat_r)
            .field("mat_z", &self.mat_z)
            .field("queried_cols", &self.queried_cols)
            .field("merkle_paths", &self.merkle_paths)
            .finish()
    }
}

/// The proof after client-side decryption; verified in the clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    pub metadata: LigeroMetadata,
    pub root: Hash,
    pub mat_r: Vec<F>,
    pub mat_z: Vec<F>,
    pub queried_cols: Vec<ColumnInstance>,
    pub merkle_paths: Vec<MerklePath>,
}

impl LigeroMetadata {
    pub(crate) fn write_to(&self, writer: &mut dyn Write) -> Result<()> {
        let rows = u32::try_from(self.rows)
            .map_err(|_| LigeroError::Dimension("rows overflow the wire format"))?;
        let cols = u32::try_from(self.cols)
            .map_err(|_| LigeroError::Dimension("cols overflow the wire format"))?;
        let rho_inv = u8::try_from(self.rho_inv)
            .map_err(|_| LigeroError::Dimension("rate inverse overflows the wire format"))?;
        let queries = u16::try_from(self.queries)
            .map_err(|_| LigeroError::Dimension("query count overflows the wire format"))?;

        let io = |e| LigeroError::io("writing metadata", e);
        writer.write_u32::<LittleEndian>(rows).map_err(io)?;
        writer.write_u32::<LittleEndian>(cols).map_err(io)?;
        writer.write_u8(rho_inv).map_err(io)?;
        writer.write_u16::<LittleEndian>(queries).map_err(io)?;
        Ok(())
    }

    pub(crate) fn read_from(reader: &mut dyn Read) -> Result<LigeroMetadata> {
        let io = |e| LigeroError::io("reading metadata", e);
        let rows = reader.read_u32::<LittleEndian>().map_err(io)? as usize;
        let cols = reader.read_u32::<LittleEndian>().map_err(io)? as usize;
        let rho_inv = reader.read_u8().map_err(io)? as usize;
        let queries = reader.read_u16::<LittleEndian>().map_err(io)? as usize;
        let meta = LigeroMetadata { rows, cols, rho_inv, queries };
        meta.validate()?;
        Ok(meta)
    }

    /// The committer invariants, re-checked when metadata arrives over the
    /// wire.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LigeroError::Dimension("matrix dimensions must be positive"));
        }
        if !self.rows.is_power_of_two() {
            return Err(LigeroError::Dimension("rows must be a power of two"));
        }
        if self.rho_inv < 2 {
            return Err(LigeroError::Dimension("code rate inverse must be at least 2"));
        }
        if !self.ext_cols().is_power_of_two() {
            return Err(LigeroError::Dimension("codeword length must be a power of two"));
        }
        if self.queries == 0 || self.queries > self.ext_cols() {
            return Err(LigeroError::Dimension("query count out of range"));
        }
        Ok(())
    }
}

impl<B: FheBackend> EncryptedProof<B> {
    pub fn write_to(&self, backend: &B, writer: &mut dyn Write) -> Result<()> {
        self.metadata.write_to(writer)?;

        write_ciphertexts(backend, &self.mat_r, writer, "writing matR")?;
        write_ciphertexts(backend, &self.mat_z, writer, "writing matZ")?;
        write_ciphertexts(backend, &self.queried_cols, writer, "writing queried columns")?;

        for path in &self.merkle_paths {
            for digest in path {
                writer
                    .write_all(digest)
                    .map_err(|e| LigeroError::io("writing merkle paths", e))?;
            }
        }

        writer
            .write_all(&self.root)
            .map_err(|e| LigeroError::io("writing root", e))?;
        Ok(())
    }

    pub fn read_from(reader: &mut dyn Read, backend: &B) -> Result<EncryptedProof<B>> {
        let metadata = LigeroMetadata::read_from(reader)?;

        // matR and matZ live in the smaller ring when a switch is attached.
        let mat_r = read_ciphertexts(backend, reader, metadata.cols, true, "reading matR")?;
        let mat_z = read_ciphertexts(backend, reader, metadata.cols, true, "reading matZ")?;
        let queried_cols =
            read_ciphertexts(backend, reader, metadata.queries, false, "reading queried columns")?;

        let depth = path_depth(metadata.ext_cols());
        let mut merkle_paths = Vec::with_capacity(metadata.queries);
        for _ in 0..metadata.queries {
            let mut path = Vec::with_capacity(depth);
            for _ in 0..depth {
                let mut digest = [0u8; 32];
                reader
                    .read_exact(&mut digest)
                    .map_err(|e| LigeroError::io("reading merkle paths", e))?;
                path.push(digest);
            }
            merkle_paths.push(path);
        }

        let mut root = [0u8; 32];
        reader
            .read_exact(&mut root)
            .map_err(|e| LigeroError::io("reading root", e))?;

        Ok(EncryptedProof {
            metadata,
            root,
            mat_r,
            mat_z,
            queried_cols,
            merkle_paths,
        })
    }

    pub fn to_bytes(&self, backend: &B) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(backend, &mut out)?;
        Ok(out)
    }

    pub fn from_bytes(bytes: &[u8], backend: &B) -> Result<EncryptedProof<B>> {
        EncryptedProof::read_from(&mut &bytes[..], backend)
    }
}

fn write_ciphertexts<B: FheBackend>(
    backend: &B,
    cts: &[B::Ciphertext],
    writer: &mut dyn Write,
    context: &'static str,
) -> Result<()> {
    let mut buf = Vec::new();
    for ct in cts {
        buf.clear();
        backend
            .write_ciphertext(ct, &mut buf)
            .map_err(|e| ct_io(context, e))?;
        writer
            .write_all(&buf)
            .map_err(|e| LigeroError::io(context, e))?;
    }
    Ok(())
}

fn read_ciphertexts<B: FheBackend>(
    backend: &B,
    reader: &mut dyn Read,
    count: usize,
    switched: bool,
    context: &'static str,
) -> Result<Vec<B::Ciphertext>> {
    let mut cts = Vec::with_capacity(count);
    for _ in 0..count {
        let ct = if switched && backend.has_ring_switch() {
            backend.read_switched_ciphertext(reader)
        } else {
            backend.read_ciphertext(reader)
        };
        cts.push(ct.map_err(|e| ct_io(context, e))?);
    }
    Ok(cts)
}

fn ct_io(context: &'static str, err: BackendError) -> LigeroError {
    match err {
        BackendError::Io(source) => LigeroError::Io { context, source },
        other => LigeroError::Backend(other),
    }
}
