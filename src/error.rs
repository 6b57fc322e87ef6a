// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::fmt;

/// Fatal conditions a build can surface. None of these are retried: the
/// diagram is either fully constructed or the build is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// A collinear site triple (or a parallel edge pair) reached a
    /// computation the convergence test is supposed to guard.
    DegenerateInput,
    /// The event queue was popped past its terminal state.
    EmptyQueueUnderflow,
    /// An edge endpoint survived the clipping pass unresolved, or a face
    /// cycle could not be walked.
    UnresolvedEdge,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::DegenerateInput => {
                write!(f, "degenerate input reached a guarded computation")
            }
            BuildError::EmptyQueueUnderflow => write!(f, "event queue underflow"),
            BuildError::UnresolvedEdge => {
                write!(f, "edge endpoint left unresolved after clipping")
            }
        }
    }
}

impl std::error::Error for BuildError {}
