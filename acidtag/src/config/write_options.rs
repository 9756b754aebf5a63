/// When an editing session writes its container back
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum WritePolicy {
	/// Only write when the editing scope completed without an error
	#[default]
	OnSuccess,
	/// Write on every exit from the editing scope, even if it returned an error
	///
	/// Chunks fetched before the failure are still written. A panic never writes.
	Always,
}

/// Options to control how acidtag writes to a file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) write_policy: WritePolicy,
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	/// 	write_policy: WritePolicy::OnSuccess,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl WriteOptions {
	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use acidtag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			write_policy: WritePolicy::OnSuccess,
		}
	}

	/// Set the [`WritePolicy`] of an editing session
	///
	/// # Examples
	///
	/// ```rust
	/// use acidtag::config::{WriteOptions, WritePolicy};
	///
	/// // Whatever happens in the session, write what we have
	/// let options = WriteOptions::new().write_policy(WritePolicy::Always);
	/// ```
	pub fn write_policy(mut self, write_policy: WritePolicy) -> Self {
		self.write_policy = write_policy;
		self
	}
}
