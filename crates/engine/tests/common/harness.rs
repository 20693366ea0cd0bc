use ipvsim_core::config::IpvConfig;
use ipvsim_core::{IpvEntry, LruIpvPolicy, ReplaceableEntry, ReplacementPolicy};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A host-side cache line slot for driving the policy directly.
#[derive(Clone, Debug)]
pub struct TestLine {
    pub set: u32,
    pub way: u32,
    pub data: IpvEntry,
}

impl ReplaceableEntry<IpvEntry> for TestLine {
    fn set(&self) -> u32 {
        self.set
    }

    fn way(&self) -> u32 {
        self.way
    }

    fn replacement_data(&self) -> &IpvEntry {
        &self.data
    }

    fn replacement_data_mut(&mut self) -> &mut IpvEntry {
        &mut self.data
    }
}

/// Builds a policy with the given associativity and schedule, sparse storage, last-wins ties.
pub fn policy(ways: i64, mru_pct: i64, quantum: i64) -> LruIpvPolicy {
    init_tracing();
    LruIpvPolicy::new(&IpvConfig {
        num_ways: ways,
        mru_pct,
        quantum,
        ..IpvConfig::default()
    })
    .unwrap()
}

/// Freshly instantiated (unplaced, invalid) slots for every way of `set`.
pub fn make_set(policy: &LruIpvPolicy, set: u32, ways: u32) -> Vec<TestLine> {
    (0..ways)
        .map(|way| TestLine {
            set,
            way,
            data: policy.instantiate_entry(),
        })
        .collect()
}

/// Valid slots of `set` whose records hold `ages`, one per way.
pub fn with_ages(set: u32, ages: &[u64]) -> Vec<TestLine> {
    ages.iter()
        .enumerate()
        .map(|(way, &age)| {
            let mut data = IpvEntry::default();
            data.age = age;
            data.valid = true;
            TestLine {
                set,
                way: way as u32,
                data,
            }
        })
        .collect()
}

/// Stored record ages, in slot order.
pub fn ages_of(lines: &[TestLine]) -> Vec<u64> {
    lines.iter().map(|line| line.data.age).collect()
}

/// Thread-safe byte sink that can be handed to an observer and read back later.
#[derive(Clone, Debug, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
