// Copyright 2016-2018 Matthew D. Michelotti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// ceil(log2(n)), with ceil_log2(0) == ceil_log2(1) == 0
pub fn ceil_log2(n: u32) -> u32 {
    if n <= 1 {
        0
    } else {
        32 - (n - 1).leading_zeros()
    }
}

// Exponentially smoothed running value. The first sample is taken as is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Smoothed {
    factor: f64,
    value: Option<f64>,
}

impl Smoothed {
    pub fn new(factor: f64) -> Smoothed {
        assert!(factor > 0.0 && factor <= 1.0, "smoothing factor must be in (0, 1]");
        Smoothed { factor, value: None }
    }

    pub fn add(&mut self, sample: f64) {
        self.value = Some(match self.value {
            Some(value) => value + self.factor * (sample - value),
            None => sample,
        });
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
