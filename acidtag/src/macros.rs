// Shorthand for return Err(AcidError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)              -> return Err(AcidError::new(ErrorKind::Variant))
// - err!(Variant(Message))     -> return Err(AcidError::new(ErrorKind::Variant(Message)))
// - err!(Variant { field, .. }) -> return Err(AcidError::new(ErrorKind::Variant { field, .. }))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::AcidError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::AcidError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
	($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
		return Err(crate::error::AcidError::new(
			crate::error::ErrorKind::$variant { $($field $(: $value)?),+ },
		))
	};
}

// Shorthand for AcidError::new(ErrorKind::MalformedHeader("Message"))
//
// Usage:
//
// - malformed_err!(Message)
//
// or bail:
//
// - malformed_err!(@BAIL Message)
macro_rules! malformed_err {
	($reason:literal) => {
		crate::error::AcidError::new(crate::error::ErrorKind::MalformedHeader($reason))
	};
	(@BAIL $reason:literal) => {
		return Err(malformed_err!($reason))
	};
}

pub(crate) use {err, malformed_err};
