//! Static log corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of raw lines as a build job or
//! container runtime would emit them, without terminators.

/// Deployment build output, including a failure and its stack trace.
pub const CORPUS_BUILD: &[&str] = &[
    "2024-01-15T10:00:00Z Cloning into 'shop-api'...",
    "2024-01-15T10:00:02Z Installing dependencies",
    "2024-01-15T10:00:09Z npm WARN deprecated request@2.88.2",
    "2024-01-15T10:00:15Z Building production bundle",
    "",
    "2024-01-15T10:00:31Z Unhandled exception: TypeError: Cannot read properties of undefined",
    "    at renderList (/app/src/list.js:14:22)",
    "2024-01-15T10:00:31Z Build failed: deployment was not completed successfully",
];

/// Container runtime output from a web service.
pub const CORPUS_RUNTIME: &[&str] = &[
    "2024-01-15 10:05:00 UTC Starting server",
    "2024-01-15 10:05:01 UTC Listening on port 3000",
    "GET /healthz 200 1ms",
    "INFO: cache warmed (412 keys)",
    "WARNING: slow query took 4200ms",
    "\x1b[31mERROR\x1b[0m upstream timeout after 30s",
    "2024-01-15 10:05:09 UTC Process exited with status 0",
];

/// Lines whose timestamp prefix has the right shape but an impossible value.
pub const CORPUS_BAD_TIMESTAMPS: &[&str] = &[
    "2024-13-01T10:00:00Z month thirteen",
    "2024-02-30 10:00:00 february thirtieth",
    "2024-01-15T25:00:00Z hour twenty-five",
];

/// Join lines into one raw stream text, each with a trailing `\n`.
pub fn stream_text(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

/// A long synthetic stream with a fixed severity mix.
pub fn corpus_high_volume(n: usize) -> String {
    (0..n)
        .map(|i| {
            let body = match i % 10 {
                0 => "ERROR: request failed",
                1 | 2 => "WARN: retrying upstream",
                3 => "Listening on port 8080",
                4 => "",
                _ => "GET /api/v1/items 200",
            };
            if body.is_empty() {
                "\n".to_string()
            } else {
                format!("2024-01-15T10:{:02}:{:02}Z {body} #{i}\n", i / 60 % 60, i % 60)
            }
        })
        .collect()
}
