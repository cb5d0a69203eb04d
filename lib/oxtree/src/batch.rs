use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Statistics about a run of consecutive members.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct MemberBatch {
    /// Position of the batch in the stream, starting at 0.
    pub index: usize,
    /// Number of members in the batch.
    pub members: usize,
    /// Number of quads of the batch members.
    pub quads: usize,
    /// Time between the arrival of the first member of the batch and the end of its last member.
    pub elapsed: Duration,
    /// Name of the first member of the batch.
    pub first_member: String,
    /// Name of the last member of the batch.
    pub last_member: String,
}

/// Groups a stream of members into batches of a fixed number of members.
///
/// A batch is closed when its last member is known to be complete,
/// i.e. when the next member starts or when [`MemberBatcher::finish`] is called.
/// The batch timer starts when its first member arrives.
///
/// ```
/// use oxtree::MemberBatcher;
/// use std::num::NonZeroUsize;
///
/// let mut batcher = MemberBatcher::new(NonZeroUsize::new(2).unwrap());
/// let mut batches = Vec::new();
/// for (name, quads) in [("a", 3), ("b", 5), ("c", 2)] {
///     batches.extend(batcher.start_member(name));
///     batcher.add_quads(quads);
/// }
/// batches.extend(batcher.finish());
/// assert_eq!(
///     batches.iter().map(|b| (b.members, b.quads)).collect::<Vec<_>>(),
///     [(2, 8), (1, 2)]
/// );
/// ```
#[derive(Debug)]
pub struct MemberBatcher {
    batch_size: NonZeroUsize,
    state: BatcherState,
    next_index: usize,
    members: usize,
    quads: usize,
    started: Option<Instant>,
    first_member: String,
    last_member: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum BatcherState {
    AwaitingFirstMember,
    InMember,
}

impl MemberBatcher {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            state: BatcherState::AwaitingFirstMember,
            next_index: 0,
            members: 0,
            quads: 0,
            started: None,
            first_member: String::new(),
            last_member: String::new(),
        }
    }

    #[inline]
    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Starts a new member.
    ///
    /// Returns the previous batch if it was already full.
    pub fn start_member(&mut self, name: &str) -> Option<MemberBatch> {
        let closed = if self.members == self.batch_size.get() {
            self.close()
        } else {
            None
        };
        if self.started.is_none() {
            self.started = Some(Instant::now());
            self.first_member.clear();
            self.first_member.push_str(name);
        }
        self.members += 1;
        self.last_member.clear();
        self.last_member.push_str(name);
        self.state = BatcherState::InMember;
        closed
    }

    /// Counts quads into the current member.
    ///
    /// Returns `false` and counts nothing if no member has been started yet.
    #[inline]
    pub fn add_quads(&mut self, count: usize) -> bool {
        match self.state {
            BatcherState::AwaitingFirstMember => false,
            BatcherState::InMember => {
                self.quads += count;
                true
            }
        }
    }

    /// Returns if a member has been started.
    #[inline]
    pub fn in_member(&self) -> bool {
        self.state == BatcherState::InMember
    }

    /// Ends the stream and returns the last, possibly partial, batch if it is not empty.
    pub fn finish(&mut self) -> Option<MemberBatch> {
        self.state = BatcherState::AwaitingFirstMember;
        self.close()
    }

    fn close(&mut self) -> Option<MemberBatch> {
        if self.members == 0 {
            return None;
        }
        let batch = MemberBatch {
            index: self.next_index,
            members: self.members,
            quads: self.quads,
            elapsed: self.started.take().map_or(Duration::ZERO, |s| s.elapsed()),
            first_member: self.first_member.clone(),
            last_member: self.last_member.clone(),
        };
        self.next_index += 1;
        self.members = 0;
        self.quads = 0;
        Some(batch)
    }
}
