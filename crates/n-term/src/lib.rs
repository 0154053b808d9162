// SPDX-License-Identifier: MIT
//
// n-term — Terminal plumbing for n-snow.
//
// Everything the snowfall needs from the terminal and nothing more:
// dimension queries, a scoped cbreak session with an idempotent teardown,
// a bounded-wait key poller fed by a background stdin reader, and cell
// output through the `Surface` seam. Escape sequences are written by hand
// in `ansi`; the simulation never sees a byte it didn't ask for.
//
// `VirtualScreen` implements the same seam in memory so the layers above
// can be tested without a terminal.

pub mod ansi;
pub mod color;
pub mod input;
pub mod output;
pub mod reader;
pub mod screen;
pub mod terminal;
