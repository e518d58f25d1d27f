// Copyright 2024 zhlinh and luacheck-review Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! External linter invocation.

pub mod luacheck;
pub mod traits;

pub use luacheck::LuacheckChecker;
pub use traits::Checker;
