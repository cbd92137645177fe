//! Persisted record codecs and key encoding.
//!
//! Rows are encoded big-endian with length-prefixed strings. Composite keys
//! (output and input rows) are `len(tx_id) ‖ tx_id ‖ index`, which keeps
//! point lookups unambiguous for arbitrary transaction id strings.

use crate::{StateError, StateResult};

/// Metadata key holding the current chain tip height.
pub(crate) const TIP_HEIGHT_KEY: &[u8] = b"tip_height";

/// A stored block row: height, creation time, and the ids of the
/// transactions it owns (in submission order, for cascade deletes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Chain height, 1-indexed.
    pub height: u64,
    /// Seconds since the Unix epoch at apply time.
    pub created_at: u64,
    /// Owned transaction ids in submission order.
    pub tx_ids: Vec<String>,
}

impl BlockRecord {
    /// Serialize the record for storage.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20 + self.tx_ids.iter().map(|t| 4 + t.len()).sum::<usize>());
        buf.extend_from_slice(&self.height.to_be_bytes());
        buf.extend_from_slice(&self.created_at.to_be_bytes());
        buf.extend_from_slice(&(self.tx_ids.len() as u32).to_be_bytes());
        for tx_id in &self.tx_ids {
            write_str(&mut buf, tx_id);
        }
        buf
    }

    /// Deserialize a record from storage.
    pub fn deserialize(bytes: &[u8]) -> StateResult<Self> {
        let mut offset = 0;
        let height = read_u64(bytes, &mut offset)?;
        let created_at = read_u64(bytes, &mut offset)?;
        let count = read_u32(bytes, &mut offset)? as usize;
        let mut tx_ids = Vec::with_capacity(count);
        for _ in 0..count {
            tx_ids.push(read_str(bytes, &mut offset)?);
        }
        Ok(Self {
            height,
            created_at,
            tx_ids,
        })
    }
}

/// A stored transaction row. Input and output counts bound the composite
/// keys this transaction owns, so cascade deletes need no scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRecord {
    /// Id of the owning block.
    pub block_id: String,
    /// Seconds since the Unix epoch at apply time.
    pub created_at: u64,
    /// Number of inputs this transaction carries.
    pub n_inputs: u32,
    /// Number of outputs this transaction created.
    pub n_outputs: u32,
}

impl TxRecord {
    /// Serialize the record for storage.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20 + self.block_id.len());
        write_str(&mut buf, &self.block_id);
        buf.extend_from_slice(&self.created_at.to_be_bytes());
        buf.extend_from_slice(&self.n_inputs.to_be_bytes());
        buf.extend_from_slice(&self.n_outputs.to_be_bytes());
        buf
    }

    /// Deserialize a record from storage.
    pub fn deserialize(bytes: &[u8]) -> StateResult<Self> {
        let mut offset = 0;
        let block_id = read_str(bytes, &mut offset)?;
        let created_at = read_u64(bytes, &mut offset)?;
        let n_inputs = read_u32(bytes, &mut offset)?;
        let n_outputs = read_u32(bytes, &mut offset)?;
        Ok(Self {
            block_id,
            created_at,
            n_inputs,
            n_outputs,
        })
    }
}

/// A stored output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    /// Receiving address.
    pub address: String,
    /// Value carried by the output. Never negative.
    pub value: u64,
    /// Whether some input references this output.
    pub spent: bool,
}

impl OutputRecord {
    /// Serialize the record for storage.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(13 + self.address.len());
        write_str(&mut buf, &self.address);
        buf.extend_from_slice(&self.value.to_be_bytes());
        buf.push(self.spent as u8);
        buf
    }

    /// Deserialize a record from storage.
    pub fn deserialize(bytes: &[u8]) -> StateResult<Self> {
        let mut offset = 0;
        let address = read_str(bytes, &mut offset)?;
        let value = read_u64(bytes, &mut offset)?;
        let spent = match bytes.get(offset) {
            Some(0) => false,
            Some(1) => true,
            _ => {
                return Err(StateError::Serialization(
                    "Malformed spent flag in output record".to_string(),
                ))
            }
        };
        Ok(Self {
            address,
            value,
            spent,
        })
    }
}

/// A stored input row, referencing the output it consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Id of the transaction that created the consumed output.
    pub spent_tx_id: String,
    /// Position of the consumed output within that transaction.
    pub spent_index: u32,
}

impl InputRecord {
    /// Serialize the record for storage.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.spent_tx_id.len());
        write_str(&mut buf, &self.spent_tx_id);
        buf.extend_from_slice(&self.spent_index.to_be_bytes());
        buf
    }

    /// Deserialize a record from storage.
    pub fn deserialize(bytes: &[u8]) -> StateResult<Self> {
        let mut offset = 0;
        let spent_tx_id = read_str(bytes, &mut offset)?;
        let spent_index = read_u32(bytes, &mut offset)?;
        Ok(Self {
            spent_tx_id,
            spent_index,
        })
    }
}

// --- Key encoding ---

/// Key for an output row: `len(tx_id) ‖ tx_id ‖ index`.
pub(crate) fn output_key(tx_id: &str, index: u32) -> Vec<u8> {
    composite_key(tx_id, index)
}

/// Key for an input row: `len(tx_id) ‖ tx_id ‖ ordinal`.
pub(crate) fn input_key(tx_id: &str, ordinal: u32) -> Vec<u8> {
    composite_key(tx_id, ordinal)
}

/// Key for the height index: big-endian height.
pub(crate) fn height_key(height: u64) -> [u8; 8] {
    height.to_be_bytes()
}

fn composite_key(tx_id: &str, index: u32) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + tx_id.len());
    key.extend_from_slice(&(tx_id.len() as u32).to_be_bytes());
    key.extend_from_slice(tx_id.as_bytes());
    key.extend_from_slice(&index.to_be_bytes());
    key
}

/// Decode an output key back to `(tx_id, index)`.
pub(crate) fn decode_output_key(key: &[u8]) -> StateResult<(String, u32)> {
    let mut offset = 0;
    let tx_id = read_str(key, &mut offset)?;
    let index = read_u32(key, &mut offset)?;
    Ok((tx_id, index))
}

/// Serialize a list of output keys (for the address index).
pub(crate) fn serialize_key_list(keys: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + keys.iter().map(|k| 4 + k.len()).sum::<usize>());
    buf.extend_from_slice(&(keys.len() as u32).to_be_bytes());
    for key in keys {
        buf.extend_from_slice(&(key.len() as u32).to_be_bytes());
        buf.extend_from_slice(key);
    }
    buf
}

/// Deserialize a list of output keys.
pub(crate) fn deserialize_key_list(bytes: &[u8]) -> StateResult<Vec<Vec<u8>>> {
    let mut offset = 0;
    let count = read_u32(bytes, &mut offset)? as usize;
    let mut keys = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_u32(bytes, &mut offset)? as usize;
        if offset + len > bytes.len() {
            return Err(StateError::Serialization(
                "Key list truncated".to_string(),
            ));
        }
        keys.push(bytes[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(keys)
}

// --- Primitive readers ---

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn read_str(bytes: &[u8], offset: &mut usize) -> StateResult<String> {
    let len = read_u32(bytes, offset)? as usize;
    if *offset + len > bytes.len() {
        return Err(StateError::Serialization("String truncated".to_string()));
    }
    let s = std::str::from_utf8(&bytes[*offset..*offset + len])
        .map_err(|e| StateError::Serialization(e.to_string()))?
        .to_string();
    *offset += len;
    Ok(s)
}

fn read_u32(bytes: &[u8], offset: &mut usize) -> StateResult<u32> {
    if *offset + 4 > bytes.len() {
        return Err(StateError::Serialization("Record truncated".to_string()));
    }
    let value = u32::from_be_bytes(bytes[*offset..*offset + 4].try_into().unwrap());
    *offset += 4;
    Ok(value)
}

fn read_u64(bytes: &[u8], offset: &mut usize) -> StateResult<u64> {
    if *offset + 8 > bytes.len() {
        return Err(StateError::Serialization("Record truncated".to_string()));
    }
    let value = u64::from_be_bytes(bytes[*offset..*offset + 8].try_into().unwrap());
    *offset += 8;
    Ok(value)
}
