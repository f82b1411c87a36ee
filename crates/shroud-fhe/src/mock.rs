//! A backend that evaluates every homomorphic operation in the clear.
//!
//! Ciphertexts are slot vectors with a level counter; "encryption" copies the
//! plaintext. This keeps the full pipeline runnable and lets tests compare
//! the encrypted prover against the plaintext reference down to the Merkle
//! root: the canonical ciphertext bytes are exactly the little-endian slot
//! values, so with `num_slots == rows` a mock leaf matches a reference leaf.

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shroud_math::Field;

use crate::backend::FheBackend;
use crate::error::{BackendError, ParamError};
use crate::params::MockParams;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCiphertext {
    slots: Vec<u64>,
    level: usize,
}

impl MockCiphertext {
    /// Decrypted slot view, for tests that inspect ciphertexts directly.
    pub fn slots(&self) -> &[u64] {
        &self.slots
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockPlaintext {
    slots: Vec<u64>,
    level: usize,
}

/// Slot-count reduction standing in for an RLWE ring switch.
#[derive(Clone, Copy, Debug)]
struct RingSwitch {
    target_slots: usize,
}

/// The clear-evaluation backend. Forks share the field and the multiplication
/// counter through `Arc`s, the same sharing discipline a real backend applies
/// to its key material.
#[derive(Clone)]
pub struct ClearBackend {
    params: MockParams,
    field: Arc<Field>,
    ring_switch: Option<RingSwitch>,
    mul_counter: Arc<AtomicU64>,
}

impl ClearBackend {
    pub fn new(params: MockParams, field: Field) -> Result<ClearBackend, ParamError> {
        if field.modulus() != params.plaintext_modulus() {
            return Err(ParamError::ModulusMismatch {
                field: field.modulus(),
                plaintext: params.plaintext_modulus(),
            });
        }
        Ok(ClearBackend {
            params,
            field: Arc::new(field),
            ring_switch: None,
            mul_counter: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Attaches a ring switch targeting `target_slots`.
    pub fn with_ring_switch(mut self, target_slots: usize) -> Result<ClearBackend, ParamError> {
        if target_slots == 0
            || !target_slots.is_power_of_two()
            || target_slots >= self.params.num_slots()
        {
            return Err(ParamError::BadRingSwitchTarget {
                target: target_slots,
                slots: self.params.num_slots(),
            });
        }
        self.ring_switch = Some(RingSwitch { target_slots });
        Ok(self)
    }

    pub fn params(&self) -> &MockParams {
        &self.params
    }

    fn modulus(&self) -> u64 {
        self.params.plaintext_modulus()
    }
}

impl FheBackend for ClearBackend {
    type Ciphertext = MockCiphertext;
    type Plaintext = MockPlaintext;

    fn field(&self) -> &Field {
        &self.field
    }

    fn max_level(&self) -> usize {
        self.params.max_level()
    }

    fn encode(&self, values: &[u64], level: usize) -> Result<MockPlaintext, BackendError> {
        let slots = self.params.num_slots();
        if values.len() > slots {
            return Err(BackendError::SlotOverflow { needed: values.len(), slots });
        }
        if level > self.max_level() {
            return Err(BackendError::LevelOutOfRange { level, max: self.max_level() });
        }
        let q = self.modulus();
        let mut packed = vec![0u64; slots];
        for (slot, &v) in packed.iter_mut().zip(values) {
            *slot = v % q;
        }
        Ok(MockPlaintext { slots: packed, level })
    }

    fn decode(&self, pt: &MockPlaintext, out: &mut [u64]) -> Result<(), BackendError> {
        if out.len() > pt.slots.len() {
            return Err(BackendError::SlotOverflow {
                needed: out.len(),
                slots: pt.slots.len(),
            });
        }
        out.copy_from_slice(&pt.slots[..out.len()]);
        Ok(())
    }

    fn encrypt(&self, pt: &MockPlaintext) -> Result<MockCiphertext, BackendError> {
        Ok(MockCiphertext {
            slots: pt.slots.clone(),
            level: pt.level,
        })
    }

    fn decrypt(&self, ct: &MockCiphertext) -> Result<MockPlaintext, BackendError> {
        Ok(MockPlaintext {
            slots: ct.slots.clone(),
            level: ct.level,
        })
    }

    fn add(&self, a: &MockCiphertext, b: &MockCiphertext) -> Result<MockCiphertext, BackendError> {
        binop(a, b, self.modulus(), |q, x, y| {
            let s = x + y;
            if s >= q {
                s - q
            } else {
                s
            }
        })
    }

    fn sub(&self, a: &MockCiphertext, b: &MockCiphertext) -> Result<MockCiphertext, BackendError> {
        binop(a, b, self.modulus(), |q, x, y| {
            let s = x + q - y;
            if s >= q {
                s - q
            } else {
                s
            }
        })
    }

    fn mul_plain(
        &self,
        ct: &MockCiphertext,
        pt: &MockPlaintext,
    ) -> Result<MockCiphertext, BackendError> {
        if ct.slots.len() != pt.slots.len() {
            return Err(BackendError::SlotMismatch {
                left: ct.slots.len(),
                right: pt.slots.len(),
            });
        }
        self.mul_counter.fetch_add(1, Ordering::Relaxed);
        let q = self.modulus() as u128;
        let slots = ct
            .slots
            .iter()
            .zip(&pt.slots)
            .map(|(&x, &y)| ((x as u128 * y as u128) % q) as u64)
            .collect();
        Ok(MockCiphertext {
            slots,
            level: ct.level.min(pt.level),
        })
    }

    fn mul_scalar(&self, ct: &mut MockCiphertext, scalar: u64) -> Result<(), BackendError> {
        self.mul_counter.fetch_add(1, Ordering::Relaxed);
        let q = self.modulus() as u128;
        let k = scalar as u128 % q;
        for slot in &mut ct.slots {
            *slot = ((*slot as u128 * k) % q) as u64;
        }
        Ok(())
    }

    fn inner_sum(
        &self,
        ct: &mut MockCiphertext,
        step: usize,
        count: usize,
    ) -> Result<(), BackendError> {
        let len = ct.slots.len();
        if count == 0 || step == 0 || (count - 1) * step >= len {
            return Err(BackendError::SlotOverflow { needed: count * step, slots: len });
        }
        let q = self.modulus();
        // Rotate-and-add: every slot j picks up the cyclic window starting at j.
        let mut out = vec![0u64; len];
        for (j, slot) in out.iter_mut().enumerate() {
            let mut acc = 0u64;
            for i in 0..count {
                acc = (acc + ct.slots[(j + i * step) % len]) % q;
            }
            *slot = acc;
        }
        ct.slots = out;
        Ok(())
    }

    fn rescale(&self, ct: &mut MockCiphertext) -> Result<(), BackendError> {
        if ct.level == 0 {
            return Err(BackendError::LevelExhausted);
        }
        ct.level -= 1;
        Ok(())
    }

    fn level(&self, ct: &MockCiphertext) -> usize {
        ct.level
    }

    fn has_ring_switch(&self) -> bool {
        self.ring_switch.is_some()
    }

    fn ring_switch(&self, mut ct: MockCiphertext) -> Result<MockCiphertext, BackendError> {
        if let Some(rs) = self.ring_switch {
            ct.slots.truncate(rs.target_slots);
        }
        Ok(ct)
    }

    fn write_ciphertext(&self, ct: &MockCiphertext, out: &mut Vec<u8>) -> Result<(), BackendError> {
        out.reserve(ct.slots.len() * 8);
        for &slot in &ct.slots {
            out.extend_from_slice(&slot.to_le_bytes());
        }
        Ok(())
    }

    fn read_ciphertext(&self, reader: &mut dyn Read) -> Result<MockCiphertext, BackendError> {
        read_slots(reader, self.params.num_slots(), self.max_level())
    }

    fn read_switched_ciphertext(
        &self,
        reader: &mut dyn Read,
    ) -> Result<MockCiphertext, BackendError> {
        match self.ring_switch {
            Some(rs) => read_slots(reader, rs.target_slots, self.max_level()),
            None => self.read_ciphertext(reader),
        }
    }

    fn fork(&self) -> ClearBackend {
        self.clone()
    }

    fn mul_count(&self) -> u64 {
        self.mul_counter.load(Ordering::Relaxed)
    }
}

fn binop(
    a: &MockCiphertext,
    b: &MockCiphertext,
    q: u64,
    op: impl Fn(u64, u64, u64) -> u64,
) -> Result<MockCiphertext, BackendError> {
    if a.level != b.level {
        return Err(BackendError::LevelMismatch { left: a.level, right: b.level });
    }
    if a.slots.len() != b.slots.len() {
        return Err(BackendError::SlotMismatch {
            left: a.slots.len(),
            right: b.slots.len(),
        });
    }
    let slots = a
        .slots
        .iter()
        .zip(&b.slots)
        .map(|(&x, &y)| op(q, x, y))
        .collect();
    Ok(MockCiphertext { slots, level: a.level })
}

fn read_slots(
    reader: &mut dyn Read,
    count: usize,
    level: usize,
) -> Result<MockCiphertext, BackendError> {
    let mut slots = vec![0u64; count];
    let mut buf = [0u8; 8];
    for slot in &mut slots {
        reader.read_exact(&mut buf)?;
        *slot = u64::from_le_bytes(buf);
    }
    Ok(MockCiphertext { slots, level })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> ClearBackend {
        let params = MockParams::new(65537, 8, 4).unwrap();
        let field = Field::new(65537, 8).unwrap();
        ClearBackend::new(params, field).unwrap()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let backend = backend();
        let pt = backend.encode(&[1, 2, 3], backend.max_level()).unwrap();
        let ct = backend.encrypt(&pt).unwrap();
        assert_eq!(backend.level(&ct), 3);

        let mut out = [0u64; 3];
        backend.decode(&backend.decrypt(&ct).unwrap(), &mut out).unwrap();
        assert_eq!(out, [1, 2, 3]);
    }

    #[test]
    fn encode_reduces_mod_t() {
        let backend = backend();
        let pt = backend.encode(&[65537, 65538], 0).unwrap();
        let ct = backend.encrypt(&pt).unwrap();
        assert_eq!(&ct.slots()[..2], &[0, 1]);
    }

    #[test]
    fn add_sub_are_slotwise_mod_t() {
        let backend = backend();
        let a = backend
            .encrypt(&backend.encode(&[65536, 5], 3).unwrap())
            .unwrap();
        let b = backend
            .encrypt(&backend.encode(&[2, 7], 3).unwrap())
            .unwrap();
        let sum = backend.add(&a, &b).unwrap();
        assert_eq!(&sum.slots()[..2], &[1, 12]);
        let diff = backend.sub(&b, &a).unwrap();
        assert_eq!(&diff.slots()[..2], &[65537 - 65534, 2]);
    }

    #[test]
    fn add_rejects_level_mismatch() {
        let backend = backend();
        let a = backend.encrypt(&backend.encode(&[1], 3).unwrap()).unwrap();
        let b = backend.encrypt(&backend.encode(&[1], 2).unwrap()).unwrap();
        assert!(matches!(
            backend.add(&a, &b),
            Err(BackendError::LevelMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn inner_sum_collects_into_slot_zero() {
        let backend = backend();
        let mut ct = backend
            .encrypt(&backend.encode(&[1, 2, 3, 4, 100], 3).unwrap())
            .unwrap();
        backend.inner_sum(&mut ct, 1, 4).unwrap();
        assert_eq!(ct.slots()[0], 10);
    }

    #[test]
    fn rescale_walks_levels_down() {
        let backend = backend();
        let mut ct = backend.encrypt(&backend.encode(&[9], 3).unwrap()).unwrap();
        while backend.level(&ct) > 1 {
            backend.rescale(&mut ct).unwrap();
        }
        assert_eq!(backend.level(&ct), 1);
        let mut out = [0u64; 1];
        backend.decode(&backend.decrypt(&ct).unwrap(), &mut out).unwrap();
        assert_eq!(out[0], 9);

        backend.rescale(&mut ct).unwrap();
        assert!(matches!(backend.rescale(&mut ct), Err(BackendError::LevelExhausted)));
    }

    #[test]
    fn serialization_round_trips() {
        let backend = backend();
        let ct = backend
            .encrypt(&backend.encode(&[11, 22, 33], backend.max_level()).unwrap())
            .unwrap();
        let mut bytes = Vec::new();
        backend.write_ciphertext(&ct, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 * backend.params().num_slots());

        let back = backend.read_ciphertext(&mut bytes.as_slice()).unwrap();
        assert_eq!(back.slots(), ct.slots());
        assert_eq!(backend.level(&back), backend.max_level());
    }

    #[test]
    fn truncated_ciphertext_is_an_error() {
        let backend = backend();
        let bytes = vec![0u8; 7];
        assert!(matches!(
            backend.read_ciphertext(&mut bytes.as_slice()),
            Err(BackendError::Io(_))
        ));
    }

    #[test]
    fn ring_switch_truncates_slots() {
        let backend = backend().with_ring_switch(2).unwrap();
        let mut ct = backend
            .encrypt(&backend.encode(&[5, 6, 7, 8], 3).unwrap())
            .unwrap();
        backend.inner_sum(&mut ct, 1, 4).unwrap();
        let switched = backend.ring_switch(ct).unwrap();
        assert_eq!(switched.slots().len(), 2);
        assert_eq!(switched.slots()[0], 26);

        let mut bytes = Vec::new();
        backend.write_ciphertext(&switched, &mut bytes).unwrap();
        let back = backend.read_switched_ciphertext(&mut bytes.as_slice()).unwrap();
        assert_eq!(back.slots(), switched.slots());
    }

    #[test]
    fn ring_switch_rejects_bad_target() {
        assert!(matches!(
            backend().with_ring_switch(8),
            Err(ParamError::BadRingSwitchTarget { target: 8, slots: 8 })
        ));
        assert!(matches!(
            backend().with_ring_switch(3),
            Err(ParamError::BadRingSwitchTarget { .. })
        ));
    }

    #[test]
    fn forks_share_the_mul_counter() {
        let backend = backend();
        let fork = backend.fork();
        let pt = backend.encode(&[2, 2], 3).unwrap();
        let ct = backend.encrypt(&pt).unwrap();

        fork.mul_plain(&ct, &pt).unwrap();
        let mut ct2 = ct.clone();
        fork.mul_scalar(&mut ct2, 3).unwrap();
        assert_eq!(backend.mul_count(), 2);
    }

    #[test]
    fn rejects_modulus_mismatch() {
        let params = MockParams::new(65537, 8, 4).unwrap();
        let field = Field::new(0x3ee0001, 8).unwrap();
        assert!(matches!(
            ClearBackend::new(params, field),
            Err(ParamError::ModulusMismatch { .. })
        ));
    }
}
