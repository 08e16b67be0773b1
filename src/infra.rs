use std::{collections::HashMap, fmt::Display, str::FromStr, time::Instant};

use anyhow::{Result, anyhow, bail};
use tracing::Span;

mod registry {
    pub type Command = fn(&[String]) -> anyhow::Result<String>;

    pub static REGISTRY: &[(&str, Command)] = &[
        ("fd-index", crate::cmd::fd_index::run as Command),
        ("fermi-dirac", crate::cmd::fermi_dirac::run as Command),
        ("isprime", crate::cmd::isprime::run as Command),
        ("primes", crate::cmd::primes::run as Command),
    ];
}

pub fn commands() -> impl Iterator<Item = &'static str> {
    registry::REGISTRY.iter().map(|(k, _)| *k)
}

pub fn dispatch(id: &str, args: &[String]) -> Result<String> {
    let f = registry::REGISTRY
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, f)| *f)
        .ok_or_else(|| {
            anyhow!(
                "unknown command `{id}` (expected one of: {})",
                commands().collect::<Vec<_>>().join(", ")
            )
        })?;
    f(args)
}

/// Parsed `--name=value` / `--name value` arguments. A bare `--name` with no
/// value records `"true"`.
#[derive(Debug, Default)]
pub struct Args<'a> {
    map: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Args<'a> {
    /// Rejects positional arguments and any name outside `allowed`.
    pub fn parse(argv: &'a [String], allowed: &[&str]) -> Result<Self> {
        let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut it = argv.iter().peekable();
        while let Some(a) = it.next() {
            let rest = a
                .strip_prefix("--")
                .ok_or_else(|| anyhow!("positional not allowed: {a}"))?;
            let (k, v) = match rest.split_once('=') {
                Some(kv) => kv,
                None => match it.next_if(|next| !next.starts_with('-')) {
                    Some(v) => (rest, v.as_str()),
                    None => (rest, "true"),
                },
            };
            if !allowed.contains(&k) {
                bail!("unknown arg `--{k}`");
            }
            map.entry(k).or_default().push(v);
        }
        Ok(Self { map })
    }

    fn parse_one<T>(key: &str, s: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        s.parse().map_err(|e| anyhow!("bad `--{key}`: {e}"))
    }

    pub fn optional<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.map.get(key).map(Vec::as_slice) {
            None => Ok(None),
            Some([v]) => Self::parse_one(key, v).map(Some),
            Some(_) => bail!("`--{key}` expects one value"),
        }
    }

    pub fn required<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.optional(key)?
            .ok_or_else(|| anyhow!("missing `--{key}`"))
    }

    pub fn many<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.map
            .get(key)
            .into_iter()
            .flatten()
            .map(|v| Self::parse_one(key, v))
            .collect()
    }

    /// Presence sets the flag; `--flag=false` clears it.
    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.map.get(key).map(Vec::as_slice) {
            None => Ok(false),
            Some(vals) if vals.iter().all(|v| *v == "true") => Ok(true),
            Some(["false"]) => Ok(false),
            Some(_) => bail!("`--{key}` expects no value or =true/false"),
        }
    }
}

/// Runs `body` inside `span` and formats the answer with its wall time.
pub fn timed(span: Span, body: impl FnOnce() -> Result<String>) -> Result<String> {
    let _enter = span.enter();
    let now = Instant::now();
    let out = body()?;
    let elapsed = now.elapsed();
    Ok(format!(
        "Result: {out} | took {:.6} seconds",
        elapsed.as_secs_f64()
    ))
}

/// Declares a command whose parameters (`T`, `Option<T>`, `Vec<T>` or
/// `bool`) are bound from `--name=value` arguments. The body evaluates to the
/// answer as a `String` and may use `?`.
#[macro_export]
macro_rules! command {
    ( ( $( $name:ident : $head:ident $(< $inner:ty >)? ),* ) $(,)? { $($body:tt)* } ) => {
        #[cfg(test)]
        pub fn run_raw( $( $name : $head $(< $inner >)? ),* ) -> ::anyhow::Result<::std::string::String> {
            Ok({ $($body)* })
        }

        pub fn run(argv: &[::std::string::String]) -> ::anyhow::Result<::std::string::String> {
            let args = $crate::infra::Args::parse(argv, &[$( stringify!($name) ),*])?;
            $(
                let $name = $crate::command!(@bind args, $name : $head $(< $inner >)?);
            )*
            let name = module_path!().rsplit("::").next().unwrap_or_default();
            let span = ::tracing::info_span!("command", name, $( $name = ?&$name ),*);
            $crate::infra::timed(span, || Ok({ $($body)* }))
        }
    };

    (@bind $args:ident, $name:ident : Option<$t:ty>) => {
        $args.optional::<$t>(stringify!($name))?
    };
    (@bind $args:ident, $name:ident : Vec<$t:ty>) => {
        $args.many::<$t>(stringify!($name))?
    };
    (@bind $args:ident, $name:ident : bool) => {
        $args.flag(stringify!($name))?
    };
    (@bind $args:ident, $name:ident : $t:ty) => {
        $args.required::<$t>(stringify!($name))?
    };
}
