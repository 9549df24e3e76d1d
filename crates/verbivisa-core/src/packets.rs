//! Study packets: fixed-size groups of word indices.
//!
//! A fresh partition shuffles every index of the word table and cuts the
//! result into chunks of `package_size`; only the last packet may be short.
//! Partitions are persisted per word source and reused until the table
//! changes size or the user asks for a new one.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::VisaError;
use crate::model::WordTable;

/// Name of the `k`-th packet (1-based).
pub fn packet_name(k: usize) -> String {
    format!("paketti_{k}")
}

/// Ordered mapping from packet name to word indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketSet(IndexMap<String, Vec<usize>>);

impl PacketSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[usize]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Sum of all packet sizes.
    pub fn total_words(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Every index of every packet, in packet order.
    pub fn all_indices(&self) -> Vec<usize> {
        self.0.values().flatten().copied().collect()
    }

    /// Whether this partition still describes a table of `table_len` words.
    ///
    /// A size mismatch means the word list changed. Indices past the end of the
    /// table are rejected as well.
    pub fn is_valid_for(&self, table_len: usize) -> bool {
        self.total_words() == table_len && self.0.values().flatten().all(|&i| i < table_len)
    }
}

impl FromIterator<(String, Vec<usize>)> for PacketSet {
    fn from_iter<T: IntoIterator<Item = (String, Vec<usize>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Randomly partition `0..len` into packets of `package_size`.
pub fn partition<R: Rng + ?Sized>(
    len: usize,
    package_size: usize,
    rng: &mut R,
) -> Result<PacketSet, VisaError> {
    if package_size == 0 {
        return Err(VisaError::ZeroPackageSize);
    }
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);

    Ok(indices
        .chunks(package_size)
        .enumerate()
        .map(|(i, chunk)| (packet_name(i + 1), chunk.to_vec()))
        .collect())
}

/// Partition with a fixed seed when one is given, otherwise with the thread RNG.
pub fn partition_seeded(
    len: usize,
    package_size: usize,
    seed: Option<u64>,
) -> Result<PacketSet, VisaError> {
    match seed {
        Some(seed) => partition(len, package_size, &mut ChaCha8Rng::seed_from_u64(seed)),
        None => partition(len, package_size, &mut rand::thread_rng()),
    }
}

/// File-backed packet partitions, keyed by word source.
#[derive(Debug)]
pub struct PacketStore {
    path: PathBuf,
    sets: BTreeMap<String, PacketSet>,
}

impl PacketStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let sets = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read packets from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse packets JSON: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            sets,
        })
    }

    /// The persisted partition for `table`, unless it is missing or stale.
    pub fn load_or_none(&self, table: &WordTable) -> Option<&PacketSet> {
        let set = self.sets.get(&table.source)?;
        if set.is_valid_for(table.len()) {
            Some(set)
        } else {
            tracing::info!(
                source = %table.source,
                packets_total = set.total_words(),
                words = table.len(),
                "stored packets are stale"
            );
            None
        }
    }

    /// Replace the partition for `source` and save the store.
    pub fn replace(&mut self, source: &str, set: PacketSet) -> Result<()> {
        self.sets.insert(source.to_string(), set);
        self.save()
    }

    /// Build a new partition for `table`, discarding any previous one.
    pub fn regenerate(
        &mut self,
        table: &WordTable,
        package_size: usize,
        seed: Option<u64>,
    ) -> Result<PacketSet> {
        let set = partition_seeded(table.len(), package_size, seed)?;
        tracing::info!(
            source = %table.source,
            packets = set.len(),
            words = table.len(),
            "created packets"
        );
        self.replace(&table.source, set.clone())?;
        Ok(set)
    }

    /// The stored partition for `table`, creating one on first use or when stale.
    pub fn ensure(
        &mut self,
        table: &WordTable,
        package_size: usize,
        seed: Option<u64>,
    ) -> Result<PacketSet> {
        match self.load_or_none(table) {
            Some(set) => Ok(set.clone()),
            None => self.regenerate(table, package_size, seed),
        }
    }

    fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.sets).context("failed to serialize packets")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write packets to {}", self.path.display()))?;
        Ok(())
    }
}
