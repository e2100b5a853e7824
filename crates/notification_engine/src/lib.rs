/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

pub mod channel;
pub mod common {
    pub mod types;
    pub mod utils;
}
pub mod environment;
pub mod monitor;
pub mod outbound {
    pub mod external;
}
pub mod platform {
    pub mod headless;
    pub mod runtime;
}
pub mod router;
pub mod signals;
pub mod storage {
    pub mod commands;
    pub mod keys;
    pub mod store;
    pub mod types;
}
pub mod token;
pub mod tools {
    pub mod callapi;
    pub mod error;
    pub mod logger;
}
pub mod vault;
