//! Two-player 8-ball. The host draws from the shared frame buffer and
//! forwards aim/shot input; all physics and rules live in `pool-engine`.

use wasm_bindgen::prelude::*;

pool_web::export_match!("eight-ball");
