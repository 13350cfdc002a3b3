use crate::api::ApiClient;
use crate::app::Route;
use prompt_shared::profile::LOADING;
use prompt_shared::{AuthSession, PasswordCredentials};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

pub enum Msg {
    UpdateEmail(String),
    UpdatePassword(String),
    Login,
    LoggedIn(AuthSession),
    Error(String),
}

pub struct LoginPage {
    email: String,
    password: String,
    loading: bool,
    error: Option<String>,
    api: ApiClient,
}

impl Component for LoginPage {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
            api: ApiClient::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateEmail(val) => {
                self.email = val;
                true
            }
            Msg::UpdatePassword(val) => {
                self.password = val;
                true
            }

            Msg::Login => {
                if self.email.is_empty() || self.password.is_empty() {
                    self.error = Some("이메일과 비밀번호를 입력하세요".to_string());
                    return true;
                }

                self.loading = true;
                self.error = None;

                let credentials = PasswordCredentials {
                    email: self.email.clone(),
                    password: self.password.clone(),
                };
                let api = self.api.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    match api.sign_in(&credentials).await {
                        Ok(session) => link.send_message(Msg::LoggedIn(session)),
                        Err(e) => link.send_message(Msg::Error(e.to_string())),
                    }
                });

                true
            }

            Msg::LoggedIn(session) => {
                log::info!("Signed in as user {}", session.user.id);
                self.loading = false;
                self.password.clear();
                if let Some(navigator) = ctx.link().navigator() {
                    navigator.push(&Route::Profile);
                }
                true
            }

            Msg::Error(e) => {
                self.error = Some(e);
                self.loading = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container login-form">
                <h1>{ "로그인" }</h1>

                if let Some(error) = &self.error {
                    <div class="error">{ error }</div>
                }

                <input
                    type="email"
                    placeholder="Email"
                    value={self.email.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdateEmail(input.value())
                    })}
                />
                <input
                    type="password"
                    placeholder="Password"
                    value={self.password.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        Msg::UpdatePassword(input.value())
                    })}
                />
                <button
                    disabled={self.loading}
                    onclick={ctx.link().callback(|_| Msg::Login)}
                >
                    { if self.loading { LOADING } else { "로그인" } }
                </button>
            </div>
        }
    }
}
