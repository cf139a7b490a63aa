use crate::directive::ConfiguredDirective;
use crate::environment::Environment;
use tracing::{debug, trace};

/// Select the URI a directive binds to.
///
/// Configurations are tried in declared order and the first passing test
/// wins; later tests are not evaluated. With no passing test the default URI
/// is returned.
pub fn resolve<'d>(directive: &'d ConfiguredDirective, env: &Environment) -> &'d str {
    for config in &directive.configurations {
        let passed = config.test.evaluate(env);
        trace!(test = %config.test, uri = %config.uri, passed, "evaluate configuration");
        if passed {
            debug!(default = %directive.default_uri, uri = %config.uri, "configuration selected");
            return &config.uri;
        }
    }
    debug!(uri = %directive.default_uri, "no configuration matched, using default");
    &directive.default_uri
}

/// [`resolve`] over a batch of directives, preserving order.
pub fn resolve_all<'d>(directives: &'d [ConfiguredDirective], env: &Environment) -> Vec<&'d str> {
    directives.iter().map(|d| resolve(d, env)).collect()
}
