/// The smallest stride the batching probe will fall back to.
pub const DEFAULT_BATCH_SLICE: u32 = 32;

/// Configuration for a queue: capacity range, probe geometry, resize
/// thresholds and the spin penalty.
///
/// All capacities and probe strides are powers of two. Fields are public so
/// call sites can use struct-update syntax over [`Config::default`];
/// validation happens when the queue is built.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Logical capacity at init (power of two, within `[min, max]`).
    pub initial_capacity: u32,
    /// Capacity floor the shrink protocol will not go below.
    pub min_capacity: u32,
    /// Slot-array allocation size; growth stops here.
    pub max_capacity: u32,
    /// Opening stride of the batching probe.
    pub batch_size: u32,
    /// Stride floor; once reached, a failed probe reports the queue full.
    pub batch_slice: u32,
    /// Full-pressure surplus that triggers a capacity doubling.
    pub enlarge_threshold: i64,
    /// Empty-pressure surplus that triggers a capacity halving.
    pub shrink_threshold: i64,
    /// Cycles to spin between probe attempts.
    pub penalty: u64,
}

impl Config {
    /// A queue starting at `initial_capacity` with the default geometry.
    pub const fn new(initial_capacity: u32, penalty: u64) -> Self {
        let mut config = Self::DEFAULT;
        config.initial_capacity = initial_capacity;
        config.penalty = penalty;
        config
    }

    /// A fixed-capacity queue: both resize thresholds are unreachable, and
    /// the probe geometry is clamped to fit small rings.
    pub const fn fixed(capacity: u32, penalty: u64) -> Self {
        let mut config = Self::DEFAULT;
        config.initial_capacity = capacity;
        config.min_capacity = capacity;
        config.max_capacity = capacity;
        if capacity / 2 < config.batch_size {
            config.batch_size = capacity / 2;
        }
        if capacity / 2 < config.batch_slice {
            config.batch_slice = capacity / 2;
        }
        config.enlarge_threshold = i64::MAX;
        config.shrink_threshold = i64::MAX;
        config.penalty = penalty;
        config
    }

    const DEFAULT: Self = Self {
        initial_capacity: 2048,
        min_capacity: 2 * DEFAULT_BATCH_SLICE,
        max_capacity: 1024 * DEFAULT_BATCH_SLICE,
        batch_size: 256,
        batch_slice: DEFAULT_BATCH_SLICE,
        enlarge_threshold: 1024,
        shrink_threshold: 128,
        penalty: 1000,
    };

    /// Panics if the configuration is internally inconsistent. Called by
    /// the queue constructor.
    pub(crate) fn validate(&self) {
        assert!(
            self.min_capacity.is_power_of_two()
                && self.max_capacity.is_power_of_two()
                && self.initial_capacity.is_power_of_two(),
            "capacities must be powers of two"
        );
        assert!(
            self.min_capacity <= self.initial_capacity
                && self.initial_capacity <= self.max_capacity,
            "initial capacity {} outside [{}, {}]",
            self.initial_capacity,
            self.min_capacity,
            self.max_capacity
        );
        assert!(
            self.max_capacity <= 1 << 24,
            "max capacity {} above the 16M-slot allocation cap",
            self.max_capacity
        );
        assert!(
            self.batch_size.is_power_of_two() && self.batch_slice.is_power_of_two(),
            "probe strides must be powers of two"
        );
        assert!(
            self.batch_slice <= self.batch_size,
            "batch slice {} above batch size {}",
            self.batch_slice,
            self.batch_size
        );
        assert!(
            self.batch_slice <= self.min_capacity / 2,
            "batch slice {} does not fit half the minimum capacity {}",
            self.batch_slice,
            self.min_capacity
        );
        assert!(
            self.enlarge_threshold > 0 && self.shrink_threshold > 0,
            "resize thresholds must be positive"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
