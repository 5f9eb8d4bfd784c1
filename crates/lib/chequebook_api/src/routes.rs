//! Route paths.

pub const GET_HEALTH: &str = "/";
pub const POST_AUTH_LOGIN: &str = "/api/v1/auth/login";
pub const GET_USERS: &str = "/api/v1/users";
pub const GET_CUSTOMER: &str = "/api/v1/customers/{account_number}";
pub const GET_SUBSCRIPTIONS: &str = "/api/v1/subscriptions";
pub const GET_SUBSCRIPTIONS_BY_STATUS: &str = "/api/v1/subscriptions/filter/{status}";
pub const POST_SUBSCRIBE: &str = "/api/v1/subscriptions/subscribe";
pub const PUT_SUBSCRIPTION: &str = "/api/v1/subscriptions/{cust_ac_no}";
pub const PUT_UNSUBSCRIBE: &str = "/api/v1/subscriptions/unsubscribe/{cust_ac_no}";
