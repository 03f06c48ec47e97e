//! Navigation capability invoked when a refresh fails.

// self
use crate::{_prelude::*, config::SessionConfig};

/// Redirect targets the session can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Redirect {
	/// Login entry point, used when the initial fetch fails.
	Login,
	/// Application root, used when a guard refresh fails.
	Root,
}
impl Redirect {
	/// Resolves the configured path for this target.
	pub fn path(self, config: &SessionConfig) -> &str {
		match self {
			Redirect::Login => &config.login_path,
			Redirect::Root => &config.root_path,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Redirect::Login => "login",
			Redirect::Root => "root",
		}
	}
}
impl Display for Redirect {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Externally supplied redirect capability.
///
/// Implemented for any `Fn(&str) + Send + Sync`, so a router handle can be passed as a closure.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `path`.
	fn navigate(&self, path: &str);
}
impl<F> Navigator for F
where
	F: Fn(&str) + Send + Sync,
{
	fn navigate(&self, path: &str) {
		self(path)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn closures_act_as_navigators() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let navigator: Arc<dyn Navigator> =
			Arc::new(move |path: &str| sink.lock().push(path.to_owned()));
		let config = crate::_preludet::test_config("https://example.com");

		navigator.navigate(Redirect::Login.path(&config));
		navigator.navigate(Redirect::Root.path(&config));

		assert_eq!(*seen.lock(), vec!["/login".to_owned(), "/".to_owned()]);
	}
}
