use chain_hub::HubError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Hub(#[from] HubError),

    #[error("Unauthorized")]
    Unauthorized {},
}
